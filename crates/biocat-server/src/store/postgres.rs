//! PostgreSQL catalog store

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{CatalogStore, CatalogTx, NewAssignment, StoreResult};
use crate::features::shared::error_helpers::map_constraint_violation;
use crate::models::{
    AssignmentDetail, Domain, DomainAssignment, DomainWithPfam, Organism, OrganismFields, Pfam,
    Protein,
};

const ORGANISM_COLUMNS: &str = "id, taxa_id, clade, genus, species";
const PROTEIN_COLUMNS: &str = "protein_id, sequence, length, id_custom, organism_id";

/// Catalog store backed by a `sqlx` connection pool
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> StoreResult<Box<dyn CatalogTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

fn organism_key(fields: &OrganismFields) -> String {
    format!(
        "({:?}, {}, {}, {})",
        fields.taxa_id, fields.clade, fields.genus, fields.species
    )
}

#[async_trait]
impl CatalogTx for PgTx {
    async fn find_organism(&mut self, key: &OrganismFields) -> StoreResult<Option<Organism>> {
        let sql = format!(
            "SELECT {ORGANISM_COLUMNS} FROM organisms \
             WHERE taxa_id IS NOT DISTINCT FROM $1 AND clade = $2 AND genus = $3 AND species = $4"
        );
        let organism = sqlx::query_as::<_, Organism>(&sql)
            .bind(key.taxa_id)
            .bind(&key.clade)
            .bind(&key.genus)
            .bind(&key.species)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(organism)
    }

    async fn get_organism(&mut self, id: i64) -> StoreResult<Option<Organism>> {
        let sql = format!("SELECT {ORGANISM_COLUMNS} FROM organisms WHERE id = $1");
        let organism = sqlx::query_as::<_, Organism>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(organism)
    }

    async fn insert_organism(&mut self, fields: &OrganismFields) -> StoreResult<Organism> {
        let sql = format!(
            "INSERT INTO organisms (taxa_id, clade, genus, species) VALUES ($1, $2, $3, $4) \
             RETURNING {ORGANISM_COLUMNS}"
        );
        sqlx::query_as::<_, Organism>(&sql)
            .bind(fields.taxa_id)
            .bind(&fields.clade)
            .bind(&fields.genus)
            .bind(&fields.species)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_constraint_violation(e, "organism", &organism_key(fields)))
    }

    async fn update_organism(&mut self, id: i64, fields: &OrganismFields) -> StoreResult<Organism> {
        let sql = format!(
            "UPDATE organisms SET taxa_id = $2, clade = $3, genus = $4, species = $5 \
             WHERE id = $1 RETURNING {ORGANISM_COLUMNS}"
        );
        sqlx::query_as::<_, Organism>(&sql)
            .bind(id)
            .bind(fields.taxa_id)
            .bind(&fields.clade)
            .bind(&fields.genus)
            .bind(&fields.species)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_constraint_violation(e, "organism", &organism_key(fields)))
    }

    async fn list_organisms(&mut self) -> StoreResult<Vec<Organism>> {
        let sql = format!("SELECT {ORGANISM_COLUMNS} FROM organisms ORDER BY id");
        let organisms = sqlx::query_as::<_, Organism>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(organisms)
    }

    async fn delete_organism(&mut self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM organisms WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_protein(&mut self, protein_id: &str) -> StoreResult<Option<Protein>> {
        let sql = format!("SELECT {PROTEIN_COLUMNS} FROM proteins WHERE protein_id = $1");
        let protein = sqlx::query_as::<_, Protein>(&sql)
            .bind(protein_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(protein)
    }

    async fn insert_protein(&mut self, protein: &Protein) -> StoreResult<Protein> {
        let sql = format!(
            "INSERT INTO proteins (protein_id, sequence, length, id_custom, organism_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROTEIN_COLUMNS}"
        );
        sqlx::query_as::<_, Protein>(&sql)
            .bind(&protein.protein_id)
            .bind(&protein.sequence)
            .bind(protein.length)
            .bind(protein.id_custom)
            .bind(protein.organism_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_constraint_violation(e, "protein", &protein.protein_id))
    }

    async fn update_protein(&mut self, protein: &Protein) -> StoreResult<Protein> {
        let sql = format!(
            "UPDATE proteins SET sequence = $2, length = $3, id_custom = $4, organism_id = $5 \
             WHERE protein_id = $1 RETURNING {PROTEIN_COLUMNS}"
        );
        sqlx::query_as::<_, Protein>(&sql)
            .bind(&protein.protein_id)
            .bind(&protein.sequence)
            .bind(protein.length)
            .bind(protein.id_custom)
            .bind(protein.organism_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_constraint_violation(e, "protein", &protein.protein_id))
    }

    async fn delete_protein(&mut self, protein_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM proteins WHERE protein_id = $1")
            .bind(protein_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_proteins(&mut self, limit: i64, offset: i64) -> StoreResult<Vec<Protein>> {
        let sql = format!(
            "SELECT {PROTEIN_COLUMNS} FROM proteins ORDER BY protein_id LIMIT $1 OFFSET $2"
        );
        let proteins = sqlx::query_as::<_, Protein>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(proteins)
    }

    async fn count_proteins(&mut self) -> StoreResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM proteins")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(total)
    }

    async fn list_proteins_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<Protein>> {
        let proteins = sqlx::query_as::<_, Protein>(
            r#"
            SELECT p.protein_id, p.sequence, p.length, p.id_custom, p.organism_id
            FROM proteins p
            JOIN organisms o ON o.id = p.organism_id
            WHERE o.taxa_id = $1
            ORDER BY p.protein_id
            "#,
        )
        .bind(taxa_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(proteins)
    }

    async fn get_pfam(&mut self, domain_id: &str) -> StoreResult<Option<Pfam>> {
        let pfam = sqlx::query_as::<_, Pfam>(
            "SELECT domain_id, domain_description FROM pfams WHERE domain_id = $1",
        )
        .bind(domain_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(pfam)
    }

    async fn insert_pfam(&mut self, pfam: &Pfam) -> StoreResult<Pfam> {
        sqlx::query_as::<_, Pfam>(
            "INSERT INTO pfams (domain_id, domain_description) VALUES ($1, $2) \
             RETURNING domain_id, domain_description",
        )
        .bind(&pfam.domain_id)
        .bind(&pfam.domain_description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_constraint_violation(e, "pfam", &pfam.domain_id))
    }

    async fn first_domain_for_pfam(&mut self, pfam_id: &str) -> StoreResult<Option<Domain>> {
        let domain = sqlx::query_as::<_, Domain>(
            "SELECT id, domain_description, pfam_id FROM domains \
             WHERE pfam_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(pfam_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(domain)
    }

    async fn insert_domain(
        &mut self,
        domain_description: &str,
        pfam_id: Option<&str>,
    ) -> StoreResult<Domain> {
        sqlx::query_as::<_, Domain>(
            "INSERT INTO domains (domain_description, pfam_id) VALUES ($1, $2) \
             RETURNING id, domain_description, pfam_id",
        )
        .bind(domain_description)
        .bind(pfam_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_constraint_violation(e, "domain", pfam_id.unwrap_or_default()))
    }

    async fn set_domain_descriptions_for_pfam(
        &mut self,
        pfam_id: &str,
        domain_description: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE domains SET domain_description = $2 WHERE pfam_id = $1")
            .bind(pfam_id)
            .bind(domain_description)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_domains_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<DomainWithPfam>> {
        let domains = sqlx::query_as::<_, DomainWithPfam>(
            r#"
            SELECT DISTINCT d.id, pf.domain_id AS pfam_id, pf.domain_description AS pfam_description
            FROM domains d
            JOIN domain_assignments a ON a.domain_id = d.id
            JOIN proteins p ON p.protein_id = a.protein_id
            JOIN organisms o ON o.id = p.organism_id
            LEFT JOIN pfams pf ON pf.domain_id = d.pfam_id
            WHERE o.taxa_id = $1
            ORDER BY d.id
            "#,
        )
        .bind(taxa_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(domains)
    }

    async fn find_assignment(
        &mut self,
        new: &NewAssignment,
    ) -> StoreResult<Option<DomainAssignment>> {
        let assignment = sqlx::query_as::<_, DomainAssignment>(
            "SELECT id, protein_id, domain_id, start_pos, end_pos FROM domain_assignments \
             WHERE protein_id = $1 AND domain_id = $2 AND start_pos = $3 AND end_pos = $4",
        )
        .bind(&new.protein_id)
        .bind(new.domain_id)
        .bind(new.start_pos)
        .bind(new.end_pos)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(assignment)
    }

    async fn insert_assignment(&mut self, new: &NewAssignment) -> StoreResult<DomainAssignment> {
        sqlx::query_as::<_, DomainAssignment>(
            "INSERT INTO domain_assignments (protein_id, domain_id, start_pos, end_pos) \
             VALUES ($1, $2, $3, $4) RETURNING id, protein_id, domain_id, start_pos, end_pos",
        )
        .bind(&new.protein_id)
        .bind(new.domain_id)
        .bind(new.start_pos)
        .bind(new.end_pos)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_constraint_violation(e, "domain assignment", &new.key()))
    }

    async fn list_assignment_details(
        &mut self,
        protein_id: &str,
    ) -> StoreResult<Vec<AssignmentDetail>> {
        let details = sqlx::query_as::<_, AssignmentDetail>(
            r#"
            SELECT a.id, d.id AS domain_id, d.domain_description,
                   pf.domain_id AS pfam_id, pf.domain_description AS pfam_description,
                   a.start_pos, a.end_pos
            FROM domain_assignments a
            JOIN domains d ON d.id = a.domain_id
            LEFT JOIN pfams pf ON pf.domain_id = d.pfam_id
            WHERE a.protein_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(protein_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(details)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let PgTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
