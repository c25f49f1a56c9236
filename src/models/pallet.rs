// src/models/pallet.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::common::{dates::parse_iso_date, text::tokenize};

// --- 1. Posição de palete (fila + slot) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PalletPosition {
    pub id: i32,
    pub row: String,
    pub slot: i32,
    pub enabled: bool,

    // Preenchido pelo repositório depois do SELECT
    #[sqlx(skip)]
    #[serde(default)]
    pub products: Vec<PalletProduct>,
}

impl PalletPosition {
    /// Código visível da posição, ex.: "S14".
    pub fn code(&self) -> String {
        format!("{}{}", self.row, self.slot)
    }

    /// Mesma posição com outra lista de produtos (resultado de um filtro).
    pub fn with_products(&self, products: Vec<PalletProduct>) -> PalletPosition {
        PalletPosition {
            id: self.id,
            row: self.row.clone(),
            slot: self.slot,
            enabled: self.enabled,
            products,
        }
    }
}

// --- 2. Produto armazenado numa posição ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PalletProduct {
    pub id: i32,
    #[serde(default)]
    pub position_id: i32,
    pub product_code: i32,
    pub description: String,
    pub unit_count: i32, // "bultos"
    pub is_full_pallet: bool,
    // Mantido como texto: um valor malformado vindo da fonte não pode derrubar o snapshot
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
}

impl PalletProduct {
    /// Data de validade já interpretada. Inválida = sem validade.
    pub fn expiration(&self) -> Option<NaiveDate> {
        self.expiration_date.as_deref().and_then(parse_iso_date)
    }
}

// --- 3. Status de validade (derivado, nunca gravado) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirationStatus {
    Normal,
    Warning, // vence em até 5 meses
    Danger,  // vence em até 3 meses
    Expired,
}

// --- 4. Resumo por produto ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    pub normal: i64,
    pub five_month_bucket: i64,
    pub three_month_bucket: i64,
    pub expired: i64,
    pub total: i64,
}

impl BucketTotals {
    pub fn add(&mut self, status: ExpirationStatus, amount: i64) {
        match status {
            ExpirationStatus::Normal => self.normal += amount,
            ExpirationStatus::Warning => self.five_month_bucket += amount,
            ExpirationStatus::Danger => self.three_month_bucket += amount,
            ExpirationStatus::Expired => self.expired += amount,
        }
        self.total += amount;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryItem {
    pub product_code: i32,
    pub description: String,
    pub unit_totals: BucketTotals,
    pub pallet_totals: BucketTotals,
}

// --- 5. Opções dos filtros (facetas) ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub code: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOption {
    pub iso_date: String,
    pub display_date: String,
    pub status: ExpirationStatus,
    pub labeled_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetOptions {
    pub products: Vec<ProductOption>,
    pub dates: Vec<DateOption>,
}

// --- 6. Sugestão "próximo a retirar" ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickSuggestion {
    pub product_id: i32,
    pub position_id: i32,
    pub row: String,
    pub slot: i32,
    pub product_code: i32,
    pub description: String,
    pub expiration_date: String,
}

// --- 7. Estado dos filtros ---
// Passado explicitamente para cada etapa do pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub product_code: Option<i32>,
    pub date: Option<NaiveDate>,
    pub status: Option<ExpirationStatus>,
}

impl FilterState {
    pub fn is_search_active(&self) -> bool {
        !tokenize(&self.query).is_empty()
    }

    pub fn is_any_facet_active(&self) -> bool {
        self.product_code.is_some() || self.date.is_some() || self.status.is_some()
    }
}

/// Tudo que a tela de posições precisa para renderizar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletView {
    pub positions: Vec<PalletPosition>,
    pub product_options: Vec<ProductOption>,
    pub date_options: Vec<DateOption>,
    pub summary: Vec<ProductSummaryItem>,
    pub suggestion: Option<PickSuggestion>,
}

// ---
// Payloads de escrita
// ---

// `length(min = 1)` aceitaria "   ", que é gravado vazio depois do trim
fn validate_not_blank(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_iso_date(raw: &str) -> Result<(), ValidationError> {
    if parse_iso_date(raw).is_none() {
        let mut err = ValidationError::new("iso_date");
        err.message = Some("A data deve estar no formato yyyy-mm-dd.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionPayload {
    #[validate(custom(function = "validate_not_blank", message = "A fila é obrigatória."))]
    pub row: String,

    #[validate(range(min = 1, message = "O slot deve ser maior que zero."))]
    pub slot: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPositionEnabledPayload {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddProductPayload {
    #[validate(range(min = 1, message = "O código do produto é obrigatório."))]
    pub product_code: i32,

    #[validate(custom(function = "validate_not_blank", message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub unit_count: i32,

    #[serde(default)]
    pub is_full_pallet: bool,

    #[validate(custom(function = "validate_iso_date"))]
    pub expiration_date: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitCountPayload {
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub unit_count: i32,
}
