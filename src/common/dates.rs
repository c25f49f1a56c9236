// src/common/dates.rs

use chrono::{Months, NaiveDate};

/// Lê uma data ISO (`yyyy-mm-dd`), aceitando sufixo de hora (`T...`).
/// Qualquer valor inválido vira `None`: o registro é tratado como "sem validade".
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Formato de exibição usado nos seletores: `dd/mm/yyyy`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Soma meses de calendário, limitando ao último dia do mês destino
/// (30/11 + 3 meses = 28/02).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
