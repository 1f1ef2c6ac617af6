//! Helpers shared by the strategy implementations.

use replay_core::error::StrategyError;
use replay_core::traits::DecisionContext;
use replay_core::types::OrderIntent;

/// Market buy with all equity, only when flat with nothing queued.
pub(crate) fn enter(ctx: &DecisionContext<'_>) -> Vec<OrderIntent> {
    if ctx.portfolio.can_enter() {
        vec![OrderIntent::buy()]
    } else {
        Vec::new()
    }
}

/// Market close, only while long with no exit queued.
pub(crate) fn exit(ctx: &DecisionContext<'_>) -> Vec<OrderIntent> {
    if ctx.portfolio.can_exit() {
        vec![OrderIntent::close()]
    } else {
        Vec::new()
    }
}

pub(crate) fn require_period(name: &str, value: usize) -> Result<(), StrategyError> {
    if value == 0 {
        return Err(StrategyError::InvalidConfig(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

pub(crate) fn require_ordered(fast: usize, slow: usize) -> Result<(), StrategyError> {
    if fast >= slow {
        return Err(StrategyError::InvalidConfig(
            "Fast period must be less than slow period".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Drives a strategy over a series the way the engine does, without a
    //! broker: the portfolio flips to long on the bar after a buy and back to
    //! flat on the bar after a close.

    use replay_core::traits::{DecisionContext, Strategy};
    use replay_core::types::{
        Bar, IndicatorSet, OrderIntent, PortfolioSnapshot, Position, PriceSeries, Side,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    pub(crate) fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c * 1.01, c * 0.99, c, 1000.0))
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn held_since(bar: &Bar, entry_bar: usize) -> Position {
        Position {
            entry_bar,
            entry_time: bar.timestamp,
            entry_price: Decimal::try_from(bar.open).unwrap(),
            units: 1,
            entry_commission: Decimal::ZERO,
        }
    }

    /// One decision at bar `index` against hand-built indicator values.
    pub(crate) fn decide_at(
        strategy: &mut dyn Strategy,
        series: &PriceSeries,
        indicators: &IndicatorSet,
        index: usize,
        long: bool,
    ) -> Vec<OrderIntent> {
        let position = long.then(|| held_since(&series.full()[0], 0));
        let portfolio = PortfolioSnapshot {
            position,
            ..PortfolioSnapshot::flat(dec!(1000000))
        };
        let ctx = DecisionContext {
            bar_index: index,
            prices: series.up_to(index).unwrap(),
            indicators: indicators.view(index),
            portfolio: &portfolio,
        };
        strategy.decide(&ctx).unwrap()
    }

    /// Intents emitted per bar.
    pub(crate) fn replay(strategy: &mut dyn Strategy, series: &PriceSeries) -> Vec<Vec<OrderIntent>> {
        strategy.reset();
        let indicators = strategy.setup(series).unwrap();
        indicators.validate_lengths(series.len()).unwrap();

        let mut position: Option<Position> = None;
        let mut queued: Option<Side> = None;
        let mut out = Vec::with_capacity(series.len());

        for i in 0..series.len() {
            let bar = series.full()[i];
            match queued.take() {
                Some(Side::Buy) => position = Some(held_since(&bar, i)),
                Some(Side::Sell) => position = None,
                None => {}
            }

            let portfolio = PortfolioSnapshot {
                position,
                ..PortfolioSnapshot::flat(dec!(1000000))
            };
            let ctx = DecisionContext {
                bar_index: i,
                prices: series.up_to(i).unwrap(),
                indicators: indicators.view(i),
                portfolio: &portfolio,
            };
            let intents = strategy.decide(&ctx).unwrap();
            queued = intents.last().map(|intent| intent.side);
            out.push(intents);
        }
        out
    }

    /// Bars on which an intent of `side` was emitted.
    pub(crate) fn bars_with(intents: &[Vec<OrderIntent>], side: Side) -> Vec<usize> {
        intents
            .iter()
            .enumerate()
            .filter(|(_, v)| v.iter().any(|i| i.side == side))
            .map(|(i, _)| i)
            .collect()
    }
}
