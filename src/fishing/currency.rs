/// Currency credit sink for fish sale proceeds
use uuid::Uuid;

use super::errors::FishingError;

/// Receives sale proceeds. Absence of a sink means proceeds are reported but not credited.
pub trait CurrencySink: Send + Sync {
    fn credit(&self, user_id: &str, amount: f64, memo: &str) -> Result<(), FishingError>;
}

/// Memo attached to every sale credit.
pub fn sale_memo(sale_id: Uuid, fish_count: usize) -> String {
    let noun = if fish_count == 1 { "fish" } else { "fishes" };
    format!("fishing sale {}: {} {}", sale_id, fish_count, noun)
}

/// Round proceeds for display, e.g. `12.35`.
pub fn format_proceeds(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_names_sale_and_count() {
        let id = Uuid::nil();
        assert_eq!(
            sale_memo(id, 1),
            "fishing sale 00000000-0000-0000-0000-000000000000: 1 fish"
        );
        assert!(sale_memo(id, 3).ends_with("3 fishes"));
    }

    #[test]
    fn proceeds_round_to_cents() {
        assert_eq!(format_proceeds(2.0), "2.00");
        assert_eq!(format_proceeds(0.125 + 0.001), "0.13");
    }
}
