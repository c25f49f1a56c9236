// src/services/pallet_service.rs

use chrono::NaiveDate;

use crate::{
    common::{
        dates::{parse_iso_date, to_iso},
        error::AppError,
    },
    db::PalletRepository,
    models::pallet::{
        AddProductPayload, FilterState, PalletPosition, PalletProduct, PalletView,
    },
    services::{
        pallet_facets::facet_options_for_state,
        pallet_filters::{apply_facet_filters, apply_search_filter},
        pallet_summary::{suggest_next, summarize},
    },
};

/// Pipeline completo: busca -> facetas -> (opções | resumo + sugestão).
/// Puro e síncrono; `today` é sempre informado por quem chama.
pub fn build_pallet_view(
    positions: &[PalletPosition],
    state: &FilterState,
    today: NaiveDate,
) -> PalletView {
    let searched = apply_search_filter(positions, &state.query);
    let filtered = apply_facet_filters(
        &searched,
        state.product_code,
        state.date,
        state.status,
        today,
        state.is_any_facet_active(),
    );

    let options = facet_options_for_state(&searched, state, today);
    let summary = summarize(&filtered, today);
    let suggestion = suggest_next(&filtered, state.is_search_active(), today);

    tracing::debug!(
        total = positions.len(),
        searched = searched.len(),
        filtered = filtered.len(),
        summary_rows = summary.len(),
        "pipeline de paletes calculado"
    );

    PalletView {
        positions: filtered,
        product_options: options.products,
        date_options: options.dates,
        summary,
        suggestion,
    }
}

#[derive(Clone)]
pub struct PalletService {
    repo: PalletRepository,
}

impl PalletService {
    pub fn new(repo: PalletRepository) -> Self {
        Self { repo }
    }

    pub async fn get_snapshot(&self) -> Result<Vec<PalletPosition>, AppError> {
        self.repo.get_snapshot().await
    }

    pub async fn get_view(
        &self,
        state: &FilterState,
        today: NaiveDate,
    ) -> Result<PalletView, AppError> {
        let snapshot = self.repo.get_snapshot().await?;
        Ok(build_pallet_view(&snapshot, state, today))
    }

    pub async fn create_position(&self, row: &str, slot: i32) -> Result<PalletPosition, AppError> {
        let row = row.trim().to_uppercase();
        let position = self.repo.create_position(&row, slot).await?;
        tracing::info!("Posição {} criada (id {})", position.code(), position.id);
        Ok(position)
    }

    pub async fn set_position_enabled(
        &self,
        id: i32,
        enabled: bool,
    ) -> Result<PalletPosition, AppError> {
        let position = self
            .repo
            .set_position_enabled(id, enabled)
            .await?
            .ok_or(AppError::PositionNotFound(id))?;
        tracing::info!(enabled, "Posição {} atualizada", position.code());
        Ok(position)
    }

    /// Uma posição só pode ser removida vazia.
    pub async fn delete_position(&self, id: i32) -> Result<(), AppError> {
        if self.repo.find_position(id).await?.is_none() {
            return Err(AppError::PositionNotFound(id));
        }
        if self.repo.count_products(id).await? > 0 {
            return Err(AppError::PositionNotEmpty(id));
        }
        if !self.repo.delete_position(id).await? {
            return Err(AppError::PositionNotFound(id));
        }
        tracing::info!("Posição {} removida", id);
        Ok(())
    }

    pub async fn add_product(
        &self,
        position_id: i32,
        mut payload: AddProductPayload,
    ) -> Result<PalletProduct, AppError> {
        let position = self
            .repo
            .find_position(position_id)
            .await?
            .ok_or(AppError::PositionNotFound(position_id))?;

        if !position.enabled {
            return Err(AppError::PositionDisabled(position_id));
        }

        // Grava sempre no formato canônico yyyy-mm-dd
        payload.expiration_date = payload
            .expiration_date
            .as_deref()
            .and_then(parse_iso_date)
            .map(to_iso);

        let product = self.repo.insert_product(position_id, &payload).await?;
        tracing::info!(
            product_code = product.product_code,
            unit_count = product.unit_count,
            "Produto adicionado na posição {}",
            position.code()
        );
        Ok(product)
    }

    pub async fn update_unit_count(
        &self,
        product_id: i32,
        unit_count: i32,
    ) -> Result<PalletProduct, AppError> {
        let product = self
            .repo
            .update_unit_count(product_id, unit_count)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;
        tracing::info!(unit_count, "Quantidade do produto {} atualizada", product_id);
        Ok(product)
    }

    pub async fn remove_product(&self, product_id: i32) -> Result<(), AppError> {
        if !self.repo.delete_product(product_id).await? {
            return Err(AppError::ProductNotFound(product_id));
        }
        tracing::info!("Produto {} retirado", product_id);
        Ok(())
    }
}
