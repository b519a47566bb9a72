use crate::error::StrategyError;
use crate::OptionsStrategy;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The plain parameter structure handed to the core by an external strategy
/// recommender. Expirations arrive as a day count rather than a date so the
/// recommendation stays valid whenever it is acted on.
///
/// ```json
/// {
///   "strategy_type": "iron_condor",
///   "symbol": "SPY",
///   "reference_price": 150.0,
///   "expiration_days": 35,
///   "short_call_strike": 155.0,
///   "long_call_strike": 160.0,
///   "short_put_strike": 145.0,
///   "long_put_strike": 140.0,
///   "net_credit": 2.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy_type", rename_all = "snake_case")]
pub enum StrategyParams {
    IronCondor {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        short_call_strike: Decimal,
        long_call_strike: Decimal,
        short_put_strike: Decimal,
        long_put_strike: Decimal,
        net_credit: Decimal,
    },
    Straddle {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    },
    Strangle {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        call_strike: Decimal,
        put_strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    },
    CallSpread {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    },
    PutSpread {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    },
    Butterfly {
        symbol: String,
        reference_price: Decimal,
        expiration_days: i64,
        low_strike: Decimal,
        middle_strike: Decimal,
        high_strike: Decimal,
        low_premium: Decimal,
        middle_premium: Decimal,
        high_premium: Decimal,
    },
}

/// Builds a validated `OptionsStrategy` from recommender parameters, with
/// the entry date fixed by the caller (the simulated clock or today).
pub fn build_strategy(
    params: &StrategyParams,
    entry_date: NaiveDate,
) -> Result<OptionsStrategy, StrategyError> {
    match params {
        StrategyParams::IronCondor {
            symbol,
            reference_price,
            expiration_days,
            short_call_strike,
            long_call_strike,
            short_put_strike,
            long_put_strike,
            net_credit,
        } => OptionsStrategy::iron_condor(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *short_call_strike,
            *long_call_strike,
            *short_put_strike,
            *long_put_strike,
            *net_credit,
        ),
        StrategyParams::Straddle {
            symbol,
            reference_price,
            expiration_days,
            strike,
            call_premium,
            put_premium,
        } => OptionsStrategy::straddle(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *strike,
            *call_premium,
            *put_premium,
        ),
        StrategyParams::Strangle {
            symbol,
            reference_price,
            expiration_days,
            call_strike,
            put_strike,
            call_premium,
            put_premium,
        } => OptionsStrategy::strangle(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *call_strike,
            *put_strike,
            *call_premium,
            *put_premium,
        ),
        StrategyParams::CallSpread {
            symbol,
            reference_price,
            expiration_days,
            buy_strike,
            sell_strike,
            buy_premium,
            sell_premium,
        } => OptionsStrategy::call_spread(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *buy_strike,
            *sell_strike,
            *buy_premium,
            *sell_premium,
        ),
        StrategyParams::PutSpread {
            symbol,
            reference_price,
            expiration_days,
            buy_strike,
            sell_strike,
            buy_premium,
            sell_premium,
        } => OptionsStrategy::put_spread(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *buy_strike,
            *sell_strike,
            *buy_premium,
            *sell_premium,
        ),
        StrategyParams::Butterfly {
            symbol,
            reference_price,
            expiration_days,
            low_strike,
            middle_strike,
            high_strike,
            low_premium,
            middle_premium,
            high_premium,
        } => OptionsStrategy::butterfly(
            symbol,
            *reference_price,
            entry_date,
            expiration_from(entry_date, *expiration_days)?,
            *low_strike,
            *middle_strike,
            *high_strike,
            *low_premium,
            *middle_premium,
            *high_premium,
        ),
    }
}

fn expiration_from(entry_date: NaiveDate, days: i64) -> Result<NaiveDate, StrategyError> {
    if days <= 0 {
        return Err(StrategyError::InvalidParameters(format!(
            "expiration_days must be positive, got {}",
            days
        )));
    }
    Ok(entry_date + Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::StrategyKind;
    use rust_decimal_macros::dec;

    fn entry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    #[test]
    fn builds_iron_condor_from_json() {
        let json = r#"{
            "strategy_type": "iron_condor",
            "symbol": "SPY",
            "reference_price": 150.0,
            "expiration_days": 35,
            "short_call_strike": 155.0,
            "long_call_strike": 160.0,
            "short_put_strike": 145.0,
            "long_put_strike": 140.0,
            "net_credit": 2.5
        }"#;

        let params: StrategyParams = serde_json::from_str(json).unwrap();
        let strategy = build_strategy(&params, entry()).unwrap();
        assert_eq!(strategy.kind(), StrategyKind::IronCondor);
        assert_eq!(strategy.symbol(), "SPY");
        assert_eq!(strategy.days_to_expiration(entry()), 35);
        assert_eq!(strategy.max_loss(), dec!(2.5));
    }

    #[test]
    fn builds_straddle_from_json() {
        let json = r#"{
            "strategy_type": "straddle",
            "symbol": "TSLA",
            "reference_price": 200.0,
            "expiration_days": 21,
            "strike": 200.0,
            "call_premium": 15.0,
            "put_premium": 12.0
        }"#;

        let params: StrategyParams = serde_json::from_str(json).unwrap();
        let strategy = build_strategy(&params, entry()).unwrap();
        assert_eq!(strategy.kind(), StrategyKind::Straddle);
        assert_eq!(strategy.max_loss(), dec!(27));
    }

    #[test]
    fn rejects_unknown_strategy_type() {
        let json = r#"{"strategy_type": "covered_call", "symbol": "SPY"}"#;
        let result: Result<StrategyParams, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_positive_expiration_days() {
        let params = StrategyParams::Straddle {
            symbol: "TSLA".to_string(),
            reference_price: dec!(200),
            expiration_days: 0,
            strike: dec!(200),
            call_premium: dec!(15),
            put_premium: dec!(12),
        };
        assert!(build_strategy(&params, entry()).is_err());
    }
}
