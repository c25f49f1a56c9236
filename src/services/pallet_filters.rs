// src/services/pallet_filters.rs

use chrono::NaiveDate;

use crate::{
    common::text::{contains_all, normalize, tokenize},
    models::pallet::{ExpirationStatus, PalletPosition, PalletProduct},
    services::expiration::product_status,
};

fn product_search_text(product: &PalletProduct) -> String {
    normalize(&format!(
        "{} {} {}",
        product.description,
        product.product_code,
        product.notes.as_deref().unwrap_or_default()
    ))
}

/// Busca livre. Se o código da posição ("S14") casa com todos os tokens, a
/// posição volta inteira; senão, só os produtos que casam. Sem tokens = entrada intacta.
pub fn apply_search_filter(positions: &[PalletPosition], query: &str) -> Vec<PalletPosition> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return positions.to_vec();
    }

    positions
        .iter()
        .filter_map(|position| {
            if contains_all(&normalize(&position.code()), &tokens) {
                return Some(position.clone());
            }

            let products: Vec<PalletProduct> = position
                .products
                .iter()
                .filter(|p| contains_all(&product_search_text(p), &tokens))
                .cloned()
                .collect();

            if products.is_empty() {
                None
            } else {
                Some(position.with_products(products))
            }
        })
        .collect()
}

/// Filtros por produto, data e status de validade, aplicados sobre o resultado da busca.
///
/// Posições vazias só aparecem quando nenhuma faceta está ativa.
pub fn apply_facet_filters(
    positions: &[PalletPosition],
    product_code: Option<i32>,
    date: Option<NaiveDate>,
    status: Option<ExpirationStatus>,
    today: NaiveDate,
    is_any_facet_active: bool,
) -> Vec<PalletPosition> {
    let passes = |product: &PalletProduct| {
        product_code.is_none_or(|code| product.product_code == code)
            && date.is_none_or(|d| product.expiration() == Some(d))
            && status.is_none_or(|s| product_status(product, today) == s)
    };

    positions
        .iter()
        .filter_map(|position| {
            if position.products.is_empty() {
                return (!is_any_facet_active).then(|| position.clone());
            }

            let products: Vec<PalletProduct> =
                position.products.iter().filter(|p| passes(p)).cloned().collect();

            if products.is_empty() {
                None
            } else {
                Some(position.with_products(products))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, code: i32, description: &str, expiration: Option<&str>) -> PalletProduct {
        PalletProduct {
            id,
            position_id: 0,
            product_code: code,
            description: description.to_string(),
            unit_count: 10,
            is_full_pallet: false,
            expiration_date: expiration.map(str::to_string),
            notes: None,
        }
    }

    fn position(id: i32, row: &str, slot: i32, products: Vec<PalletProduct>) -> PalletPosition {
        PalletPosition { id, row: row.into(), slot, enabled: true, products }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn snapshot() -> Vec<PalletPosition> {
        vec![
            position(
                1,
                "S",
                14,
                vec![
                    product(1, 100, "Leche entera", Some("2024-02-01")),
                    product(2, 200, "Azúcar refinada", Some("2024-09-01")),
                    product(3, 300, "Harina 000", None),
                ],
            ),
            position(2, "T", 3, vec![product(4, 100, "Leche entera", Some("2023-12-01"))]),
            position(3, "T", 4, vec![]),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let positions = snapshot();
        assert_eq!(apply_search_filter(&positions, ""), positions);
        assert_eq!(apply_search_filter(&positions, "   "), positions);
    }

    #[test]
    fn position_code_match_keeps_every_product() {
        let result = apply_search_filter(&snapshot(), "S14");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].products.len(), 3);
    }

    #[test]
    fn product_match_keeps_only_matching_products() {
        let result = apply_search_filter(&snapshot(), "azucar");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
        assert_eq!(result[0].products.len(), 1);
        assert_eq!(result[0].products[0].id, 2);
    }

    #[test]
    fn all_tokens_must_match() {
        let result = apply_search_filter(&snapshot(), "leche 100");
        assert_eq!(result.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        assert!(apply_search_filter(&snapshot(), "leche 200").is_empty());
    }

    #[test]
    fn notes_are_searchable() {
        let mut positions = snapshot();
        positions[1].products[0].notes = Some("Rotura en esquina".into());
        let result = apply_search_filter(&positions, "rotura");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn facets_without_selection_keep_everything() {
        let positions = snapshot();
        assert_eq!(
            apply_facet_filters(&positions, None, None, None, today(), false),
            positions
        );
    }

    #[test]
    fn product_code_facet_drops_empty_positions() {
        let result = apply_facet_filters(&snapshot(), Some(100), None, None, today(), true);
        assert_eq!(result.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(result[0].products.len(), 1);
    }

    #[test]
    fn date_and_status_facets() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1);
        let by_date = apply_facet_filters(&snapshot(), None, date, None, today(), true);
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].products[0].id, 2);

        let expired = apply_facet_filters(
            &snapshot(),
            None,
            None,
            Some(ExpirationStatus::Expired),
            today(),
            true,
        );
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, 2);

        let normal = apply_facet_filters(
            &snapshot(),
            None,
            None,
            Some(ExpirationStatus::Normal),
            today(),
            true,
        );
        // sem validade conta como normal
        assert_eq!(
            normal[0].products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn invalid_date_never_matches_date_facet() {
        let positions = vec![position(9, "A", 1, vec![product(9, 1, "X", Some("bad"))])];
        let date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(apply_facet_filters(&positions, None, date, None, today(), true).is_empty());
    }
}
