// src/services/pallet_facets.rs

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::{
    common::{
        dates::{format_display_date, to_iso},
        text::locale_cmp,
    },
    models::pallet::{DateOption, FacetOptions, FilterState, PalletPosition, ProductOption},
    services::{
        expiration::{status_for_date, status_suffix},
        pallet_filters::apply_facet_filters,
    },
};

/// Produtos distintos (primeira descrição vista) e datas de validade distintas
/// presentes no conjunto já filtrado.
pub fn compute_facet_options(positions: &[PalletPosition], today: NaiveDate) -> FacetOptions {
    let mut seen_codes = HashSet::new();
    let mut products = Vec::new();
    let mut dates = BTreeSet::new();

    for product in positions.iter().flat_map(|p| &p.products) {
        if seen_codes.insert(product.product_code) {
            products.push(ProductOption {
                code: product.product_code,
                description: product.description.clone(),
            });
        }
        if let Some(date) = product.expiration() {
            dates.insert(date);
        }
    }

    products.sort_by(|a, b| locale_cmp(&a.description, &b.description));

    // BTreeSet já entrega em ordem cronológica
    let dates = dates
        .into_iter()
        .map(|date| {
            let status = status_for_date(Some(date), today);
            let display_date = format_display_date(date);
            DateOption {
                iso_date: to_iso(date),
                labeled_text: format!("{}{}", display_date, status_suffix(status)),
                display_date,
                status,
            }
        })
        .collect();

    FacetOptions { products, dates }
}

/// Opções de cada faceta calculadas ignorando a própria seleção: a lista de
/// produtos não é encolhida pelo produto escolhido, nem a de datas pela data.
pub fn facet_options_for_state(
    searched: &[PalletPosition],
    state: &FilterState,
    today: NaiveDate,
) -> FacetOptions {
    let without_product = FilterState { product_code: None, ..state.clone() };
    let for_products = apply_facet_filters(
        searched,
        None,
        state.date,
        state.status,
        today,
        without_product.is_any_facet_active(),
    );

    let without_date = FilterState { date: None, ..state.clone() };
    let for_dates = apply_facet_filters(
        searched,
        state.product_code,
        None,
        state.status,
        today,
        without_date.is_any_facet_active(),
    );

    FacetOptions {
        products: compute_facet_options(&for_products, today).products,
        dates: compute_facet_options(&for_dates, today).dates,
    }
}
