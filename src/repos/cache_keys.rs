/*
 * Responsibility
 * - Cache key derivation for the movie repository
 * - Search and detail keys live in separate namespaces (search: / movie:)
 * - The page goes before the query so no (query, page) pair can alias another
 */

pub fn search_key(query: &str, page: u32) -> String {
    format!("search:{}:{}", page, query.to_lowercase())
}

pub fn detail_key(id: i64) -> String {
    format!("movie:{}", id)
}
