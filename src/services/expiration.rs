// src/services/expiration.rs

use chrono::NaiveDate;

use crate::{
    common::dates::add_months,
    models::pallet::{ExpirationStatus, PalletProduct},
};

pub const DANGER_MONTHS: u32 = 3;
pub const WARNING_MONTHS: u32 = 5;

/// Classifica uma data de validade em relação a `today`.
/// `today` sempre vem de quem chama; aqui nunca se lê o relógio.
pub fn status_for_date(expiration: Option<NaiveDate>, today: NaiveDate) -> ExpirationStatus {
    let Some(date) = expiration else {
        return ExpirationStatus::Normal;
    };

    if date < today {
        ExpirationStatus::Expired
    } else if date <= add_months(today, DANGER_MONTHS) {
        ExpirationStatus::Danger
    } else if date <= add_months(today, WARNING_MONTHS) {
        ExpirationStatus::Warning
    } else {
        ExpirationStatus::Normal
    }
}

pub fn product_status(product: &PalletProduct, today: NaiveDate) -> ExpirationStatus {
    status_for_date(product.expiration(), today)
}

/// Sufixo mostrado no seletor de datas.
pub fn status_suffix(status: ExpirationStatus) -> &'static str {
    match status {
        ExpirationStatus::Expired => " VDO",
        ExpirationStatus::Danger => " <3M",
        ExpirationStatus::Warning => " <5M",
        ExpirationStatus::Normal => "",
    }
}
