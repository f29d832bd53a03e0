//! Human-readable explanations attached to a verdict

use crate::config::DetectionConfig;

const COMPLEX_ANOMALY: &str =
    "Otkrivena složena anomalija od strane AI (kombinacija cijene, starosti i specifikacija).";

/// Explain the verdict in Bosnian, most specific reason first
pub fn generate_reasons(
    smart_ratio: f64,
    market_km_diff: i64,
    expected_km: i64,
    is_suspicious: bool,
    settings: &DetectionConfig,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if smart_ratio < settings.suspicious_ratio_threshold {
        let percentage = (smart_ratio * 100.0).trunc() as i64;
        reasons.push(format!(
            "Kilometraža je sumnjiva: Samo {}% od očekivanih {} km.",
            percentage,
            group_thousands(expected_km)
        ));
    }

    if market_km_diff < settings.market_diff_threshold {
        reasons.push(format!(
            "Automobil ima {} km manje od sličnih oglasa na tržištu.",
            group_thousands(market_km_diff.saturating_abs())
        ));
    }

    if reasons.is_empty() && is_suspicious {
        reasons.push(COMPLEX_ANOMALY.to_string());
    }

    reasons
}

/// `150000` -> `150,000`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
