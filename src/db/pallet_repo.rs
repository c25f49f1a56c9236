// src/db/pallet_repo.rs

use std::collections::HashMap;

use sqlx::PgPool;
use crate::{
    common::error::AppError,
    models::pallet::{AddProductPayload, PalletPosition, PalletProduct},
};

const POSITION_COLUMNS: &str = r#"id, "row" AS row, slot, enabled"#;

// A data sai como texto (yyyy-mm-dd), que é o formato do snapshot
const PRODUCT_COLUMNS: &str = r#"
    id, position_id, product_code, description, unit_count, is_full_pallet,
    to_char(expiration_date, 'YYYY-MM-DD') AS expiration_date, notes
"#;

// O repositório das posições de palete e dos produtos guardados nelas
#[derive(Clone)]
pub struct PalletRepository {
    pool: PgPool,
}

impl PalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    /// Snapshot completo: posições por fila/slot, cada uma com seus produtos por id.
    pub async fn get_snapshot(&self) -> Result<Vec<PalletPosition>, AppError> {
        // As duas leituras precisam enxergar o mesmo snapshot do banco
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let positions = sqlx::query_as::<_, PalletPosition>(&format!(
            r#"SELECT {POSITION_COLUMNS} FROM pallet_positions ORDER BY "row" ASC, slot ASC"#
        ))
        .fetch_all(&mut *tx)
        .await?;

        let products = sqlx::query_as::<_, PalletProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM pallet_products ORDER BY position_id ASC, id ASC"
        ))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(attach_products(positions, products))
    }

    pub async fn find_position(&self, id: i32) -> Result<Option<PalletPosition>, AppError> {
        let position = sqlx::query_as::<_, PalletPosition>(&format!(
            "SELECT {POSITION_COLUMNS} FROM pallet_positions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(position)
    }

    pub async fn count_products(&self, position_id: i32) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pallet_products WHERE position_id = $1")
                .bind(position_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // ---
    // Escrita
    // ---

    pub async fn create_position(&self, row: &str, slot: i32) -> Result<PalletPosition, AppError> {
        sqlx::query_as::<_, PalletPosition>(&format!(
            r#"INSERT INTO pallet_positions ("row", slot) VALUES ($1, $2) RETURNING {POSITION_COLUMNS}"#
        ))
        .bind(row)
        .bind(slot)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única (row, slot) num erro amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::PositionAlreadyExists { row: row.to_string(), slot };
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn set_position_enabled(
        &self,
        id: i32,
        enabled: bool,
    ) -> Result<Option<PalletPosition>, AppError> {
        let position = sqlx::query_as::<_, PalletPosition>(&format!(
            "UPDATE pallet_positions SET enabled = $2 WHERE id = $1 RETURNING {POSITION_COLUMNS}"
        ))
        .bind(id)
        .bind(enabled)
        .fetch_optional(&self.pool)
        .await?;
        Ok(position)
    }

    pub async fn delete_position(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pallet_positions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            // Produto inserido depois da checagem: a FK (RESTRICT) barra o DELETE
            .map_err(|e| foreign_key_violation_as(e, AppError::PositionNotEmpty(id)))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_product(
        &self,
        position_id: i32,
        payload: &AddProductPayload,
    ) -> Result<PalletProduct, AppError> {
        let product = sqlx::query_as::<_, PalletProduct>(&format!(
            r#"
            INSERT INTO pallet_products
                (position_id, product_code, description, unit_count, is_full_pallet, expiration_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6::date, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(position_id)
        .bind(payload.product_code)
        .bind(payload.description.trim())
        .bind(payload.unit_count)
        .bind(payload.is_full_pallet)
        .bind(payload.expiration_date.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        // Posição removida depois da checagem
        .map_err(|e| foreign_key_violation_as(e, AppError::PositionNotFound(position_id)))?;
        Ok(product)
    }

    pub async fn update_unit_count(
        &self,
        product_id: i32,
        unit_count: i32,
    ) -> Result<Option<PalletProduct>, AppError> {
        let product = sqlx::query_as::<_, PalletProduct>(&format!(
            "UPDATE pallet_products SET unit_count = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(unit_count)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn delete_product(&self, product_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pallet_products WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Pendura cada produto na sua posição, mantendo a ordem das duas listas.
fn attach_products(
    mut positions: Vec<PalletPosition>,
    products: Vec<PalletProduct>,
) -> Vec<PalletPosition> {
    let index: HashMap<i32, usize> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    for product in products {
        match index.get(&product.position_id) {
            Some(&i) => positions[i].products.push(product),
            None => tracing::warn!(
                product_id = product.id,
                position_id = product.position_id,
                "Produto sem posição no snapshot"
            ),
        }
    }

    positions
}

/// Violação de FK vira o erro de domínio informado; o resto segue como erro de banco.
fn foreign_key_violation_as(e: sqlx::Error, mapped: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return mapped;
        }
    }
    AppError::DatabaseError(e)
}
