/// Percentage of raw records for which an enriched counterpart exists.
///
/// Zero raw records always yield 0, never 100. An incomplete job never
/// reports 100 (rounding is capped at 99 below equality), and a backend
/// that hands back more results than raw rows is clamped to 100 rather
/// than trusted.
pub fn enrichment_percent(enriched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    if enriched >= total {
        return 100;
    }
    let percent = ((enriched as f64) * 100.0 / (total as f64)).round() as u8;
    percent.min(99)
}
