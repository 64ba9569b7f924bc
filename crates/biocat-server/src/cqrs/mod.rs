pub use mediator::DefaultAsyncMediator;

use crate::store::SharedStore;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(store: SharedStore) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Proteins
        .add_handler({
            let store = store.clone();
            move |cmd| {
                let store = store.clone();
                async move { crate::features::proteins::commands::create::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |cmd| {
                let store = store.clone();
                async move { crate::features::proteins::commands::update::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |cmd| {
                let store = store.clone();
                async move { crate::features::proteins::commands::delete::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move { crate::features::proteins::queries::get::handle(store, query).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move { crate::features::proteins::queries::list::handle(store, query).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move {
                    crate::features::proteins::queries::list_by_taxa::handle(store, query).await
                }
            }
        })
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move { crate::features::proteins::queries::coverage::handle(store, query).await }
            }
        })
        // Pfams
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move { crate::features::pfams::queries::get::handle(store, query).await }
            }
        })
        .add_handler({
            let store = store.clone();
            move |query| {
                let store = store.clone();
                async move { crate::features::pfams::queries::list_by_taxa::handle(store, query).await }
            }
        })
        .build()
}
