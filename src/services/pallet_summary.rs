// src/services/pallet_summary.rs

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    common::{dates::to_iso, text::locale_cmp},
    models::pallet::{BucketTotals, PalletPosition, PickSuggestion, ProductSummaryItem},
    services::expiration::product_status,
};

/// Totais por código de produto, separados por faixa de validade.
/// Bultos sempre somam; paletes só quando o produto ocupa o palete inteiro.
pub fn summarize(positions: &[PalletPosition], today: NaiveDate) -> Vec<ProductSummaryItem> {
    let mut index: HashMap<i32, usize> = HashMap::new();
    let mut items: Vec<ProductSummaryItem> = Vec::new();

    for product in positions.iter().flat_map(|p| &p.products) {
        let status = product_status(product, today);

        let slot = *index.entry(product.product_code).or_insert_with(|| {
            items.push(ProductSummaryItem {
                product_code: product.product_code,
                description: product.description.clone(),
                unit_totals: BucketTotals::default(),
                pallet_totals: BucketTotals::default(),
            });
            items.len() - 1
        });

        let item = &mut items[slot];
        item.unit_totals.add(status, i64::from(product.unit_count));
        if product.is_full_pallet {
            item.pallet_totals.add(status, 1);
        }
    }

    // sort estável: códigos com a mesma descrição mantêm a ordem de aparição
    items.sort_by(|a, b| locale_cmp(&a.description, &b.description));
    items
}

/// Produto com a validade mais próxima que ainda não venceu.
/// Empate: vale o primeiro encontrado (ordem das posições, depois dos produtos).
pub fn suggest_next(
    positions: &[PalletPosition],
    search_active: bool,
    today: NaiveDate,
) -> Option<PickSuggestion> {
    if positions.is_empty() && !search_active {
        return None;
    }

    let mut best: Option<(NaiveDate, &PalletPosition, usize)> = None;

    for position in positions {
        for (i, product) in position.products.iter().enumerate() {
            let Some(date) = product.expiration() else {
                continue;
            };
            if date < today {
                continue;
            }
            if best.is_none_or(|(current, _, _)| date < current) {
                best = Some((date, position, i));
            }
        }
    }

    best.map(|(date, position, i)| {
        let product = &position.products[i];
        PickSuggestion {
            product_id: product.id,
            position_id: position.id,
            row: position.row.clone(),
            slot: position.slot,
            product_code: product.product_code,
            description: product.description.clone(),
            expiration_date: to_iso(date),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pallet::PalletProduct;

    fn product(
        id: i32,
        code: i32,
        units: i32,
        full: bool,
        expiration: Option<&str>,
    ) -> PalletProduct {
        PalletProduct {
            id,
            position_id: 0,
            product_code: code,
            description: format!("Producto {code}"),
            unit_count: units,
            is_full_pallet: full,
            expiration_date: expiration.map(str::to_string),
            notes: None,
        }
    }

    fn position(id: i32, slot: i32, products: Vec<PalletProduct>) -> PalletPosition {
        PalletPosition { id, row: "R".into(), slot, enabled: true, products }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_code_accumulates_into_one_row() {
        let positions = vec![
            position(1, 1, vec![product(1, 7, 5, true, Some("2023-12-31"))]),
            position(2, 2, vec![product(2, 7, 10, false, Some("2024-08-01"))]),
        ];
        let summary = summarize(&positions, date(2024, 1, 1));
        assert_eq!(summary.len(), 1);

        let units = summary[0].unit_totals;
        assert_eq!(units.total, 15);
        assert_eq!(units.expired, 5);
        assert_eq!(units.normal, 10);

        let pallets = summary[0].pallet_totals;
        assert_eq!(pallets.total, 1);
        assert_eq!(pallets.expired, 1);
        assert_eq!(pallets.normal, 0);
    }

    #[test]
    fn buckets_map_to_warning_and_danger() {
        let positions = vec![position(
            1,
            1,
            vec![
                product(1, 1, 3, true, Some("2024-03-15")),
                product(2, 1, 4, true, Some("2024-05-01")),
                product(3, 1, 6, false, None),
            ],
        )];
        let summary = summarize(&positions, date(2024, 1, 1));
        let units = summary[0].unit_totals;
        assert_eq!(units.three_month_bucket, 3);
        assert_eq!(units.five_month_bucket, 4);
        assert_eq!(units.normal, 6);
        assert_eq!(units.total, 13);
        assert_eq!(summary[0].pallet_totals.total, 2);
    }

    #[test]
    fn first_description_wins_and_rows_sort_by_description() {
        let mut first = product(1, 2, 1, false, None);
        first.description = "Zapallo".into();
        let mut renamed = product(2, 2, 1, false, None);
        renamed.description = "Another name".into();
        let mut other = product(3, 9, 1, false, None);
        other.description = "Ñoquis".into();

        let summary = summarize(&[position(1, 1, vec![first, renamed, other])], date(2024, 1, 1));
        let labels: Vec<_> = summary.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(labels, vec!["Ñoquis", "Zapallo"]);
    }

    #[test]
    fn suggestion_skips_expired_stock() {
        let positions = vec![position(
            1,
            1,
            vec![
                product(1, 1, 1, false, Some("2024-01-01")),
                product(2, 1, 1, false, Some("2024-03-01")),
            ],
        )];
        let suggestion = suggest_next(&positions, false, date(2024, 2, 1)).unwrap();
        assert_eq!(suggestion.product_id, 2);
        assert_eq!(suggestion.expiration_date, "2024-03-01");
    }

    #[test]
    fn suggestion_includes_products_expiring_today() {
        let positions = vec![position(1, 1, vec![product(1, 1, 1, false, Some("2024-02-01"))])];
        let suggestion = suggest_next(&positions, false, date(2024, 2, 1)).unwrap();
        assert_eq!(suggestion.product_id, 1);
    }

    #[test]
    fn ties_keep_iteration_order() {
        let positions = vec![
            position(1, 1, vec![product(1, 1, 1, false, Some("2024-06-01"))]),
            position(2, 2, vec![
                product(2, 1, 1, false, Some("2024-05-01")),
                product(3, 1, 1, false, Some("2024-05-01")),
            ]),
            position(3, 3, vec![product(4, 1, 1, false, Some("2024-05-01"))]),
        ];
        let suggestion = suggest_next(&positions, false, date(2024, 1, 1)).unwrap();
        assert_eq!(suggestion.product_id, 2);
        assert_eq!(suggestion.position_id, 2);
        assert_eq!(suggestion.slot, 2);
    }

    #[test]
    fn nothing_to_suggest() {
        assert_eq!(suggest_next(&[], false, date(2024, 1, 1)), None);
        assert_eq!(suggest_next(&[], true, date(2024, 1, 1)), None);

        let undated = vec![position(1, 1, vec![product(1, 1, 1, false, None)])];
        assert_eq!(suggest_next(&undated, false, date(2024, 1, 1)), None);
    }
}
