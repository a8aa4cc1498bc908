//! Unit tests for types module

use augur::{
    Candle, Column, IndicatorKind, IndicatorVote, Numeric, RawCandle, SignalConfig, SignalLabel,
    SignalReport, StrategyConfig, Timeframe,
};

#[test]
fn test_signal_label_serialization() {
    let labels = [
        (SignalLabel::Buy, "\"BUY\""),
        (SignalLabel::WeakBuy, "\"WEAK_BUY\""),
        (SignalLabel::Hold, "\"HOLD\""),
        (SignalLabel::WeakSell, "\"WEAK_SELL\""),
        (SignalLabel::Sell, "\"SELL\""),
        (SignalLabel::InsufficientData, "\"INSUFFICIENT_DATA\""),
    ];
    for (label, json) in labels {
        assert_eq!(serde_json::to_string(&label).unwrap(), json);
        assert_eq!(format!("\"{}\"", label), json);
    }
}

#[test]
fn test_timeframe_round_trip_names() {
    for timeframe in Timeframe::ALL {
        let json = serde_json::to_string(&timeframe).unwrap();
        assert_eq!(json, format!("\"{}\"", timeframe.as_str()));
        assert_eq!(Timeframe::from_str(timeframe.as_str()), Some(timeframe));
    }
    assert_eq!(Timeframe::from_str("1M"), Some(Timeframe::OneMonth));
    assert_eq!(Timeframe::from_str("1m"), Some(Timeframe::OneMinute));
    assert_eq!(Timeframe::from_str("2h"), None);
    assert_eq!(Timeframe::default(), Timeframe::FourHours);
}

#[test]
fn test_column_names() {
    let names: Vec<&str> = Column::ALL.iter().map(|c| c.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "sma_fast",
            "sma_slow",
            "rsi",
            "macd",
            "macd_signal",
            "macd_hist",
            "bb_upper",
            "bb_middle",
            "bb_lower"
        ]
    );
    assert!(Column::Rsi.is_critical());
    assert!(!Column::MacdHist.is_critical());
    assert!(!Column::BbUpper.is_critical());
}

#[test]
fn test_raw_candle_accepts_numbers_and_strings() {
    let json = r#"{"time":1,"open":"1.5","high":2,"low":"0.5","close":1.25,"volume":null}"#;
    let raw: RawCandle = serde_json::from_str(json).unwrap();

    assert_eq!(raw.open, Some(Numeric::Text("1.5".into())));
    assert_eq!(raw.high, Some(Numeric::Number(2.0)));
    assert_eq!(raw.volume, None);
    assert!(raw.coerce().is_none());
}

#[test]
fn test_numeric_rejects_non_finite() {
    assert_eq!(Numeric::from("NaN").coerce(), None);
    assert_eq!(Numeric::from("inf").coerce(), None);
    assert_eq!(Numeric::from(" 42.5 ").coerce(), Some(42.5));
    assert_eq!(Numeric::from(f64::INFINITY).coerce(), None);
}

#[test]
fn test_candle_round_trip_through_raw() {
    let candle = Candle::flat(10, 3.0, 7.0);
    let raw: RawCandle = candle.into();
    assert_eq!(raw.coerce(), Some(candle));
}

#[test]
fn test_signal_report_serialization() {
    let report = SignalReport {
        symbol: "BTC".to_string(),
        timeframe: Timeframe::OneDay,
        signal: SignalLabel::WeakSell,
        candles: 120,
        latest: None,
        votes: vec![IndicatorVote {
            indicator: IndicatorKind::Bollinger,
            bullish: false,
            bearish: true,
        }],
        timestamp: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["timeframe"], "1d");
    assert_eq!(json["signal"], "WEAK_SELL");
    assert!(json.get("latest").is_none());
    assert_eq!(json["votes"][0]["indicator"], "bollinger");
    assert_eq!(json["votes"][0]["bearish"], true);
}

#[test]
fn test_strategy_config_defaults() {
    let strategy = StrategyConfig::default();
    assert_eq!(strategy.indicators.sma_fast, 20);
    assert_eq!(strategy.indicators.sma_slow, 50);
    assert_eq!(strategy.signals, SignalConfig::default());
    assert_eq!(strategy.signals.min_candles, 52);
    assert!(strategy.indicators.validate().is_ok());
}
