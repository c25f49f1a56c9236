// src/common/text.rs

use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Normaliza um texto para busca: remove acentos (NFD + descarte das marcas
/// combinantes), passa para minúsculas e colapsa espaços.
///
/// `normalize("  Á é  Í ") == "a e i"`
pub fn normalize(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quebra a busca em tokens já normalizados. Busca vazia -> nenhum token.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Semântica AND: todos os tokens precisam aparecer no texto.
/// `text` já deve estar normalizado.
pub fn contains_all(text: &str, tokens: &[String]) -> bool {
    tokens.iter().all(|t| text.contains(t.as_str()))
}

/// Comparação "estilo locale" para descrições: ignora acento e caixa,
/// desempata pelo texto original para manter a ordem determinística.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b)).then_with(|| a.cmp(b))
}
