//! Black-box tests for the greedy cross-venue matcher
//!
//! Random books come from a seeded `ChaCha8Rng` so every run sees the same
//! fixtures.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use venue_arb::arbitrage::{
    build_book, find_best_arbitrage, sample_books, total_net_profit, ArbitrageMatcher,
    MatcherConfig, Quote, QuoteBook, QuoteId, RawBook, Side, Trade,
};
use venue_arb::MatchError;

const VENUES: [&str; 4] = ["ex1", "ex2", "ex3", "ex4"];
const FEES: [f64; 4] = [0.0, 0.0002, 0.0005, 0.001];

fn random_book(rng: &mut ChaCha8Rng, side: Side) -> QuoteBook {
    let mut quotes = Vec::new();
    for venue in VENUES {
        let mut ticks: Vec<u32> = (0..20).collect();
        ticks.shuffle(rng);
        let levels = rng.gen_range(0..=3);
        for &tick in ticks.iter().take(levels) {
            let price = 0.90 + 0.01 * tick as f64;
            let fee = *FEES.choose(rng).unwrap();
            let volume = rng.gen_range(0..=20);
            quotes.push(Quote::new(venue, fee, price, volume).unwrap());
        }
    }
    QuoteBook::new(side, quotes).unwrap()
}

fn volumes(book: &QuoteBook) -> HashMap<QuoteId, u64> {
    book.iter().map(|(id, q)| (id, q.volume())).collect()
}

fn consumed(trades: &[Trade], side: Side) -> HashMap<QuoteId, u64> {
    let mut out = HashMap::new();
    for t in trades {
        let leg = match side {
            Side::Ask => &t.buy,
            Side::Bid => &t.sell,
        };
        *out.entry(leg.quote_id).or_insert(0) += t.quantity;
    }
    out
}

fn assert_invariants(seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bids = random_book(&mut rng, Side::Bid);
    let mut asks = random_book(&mut rng, Side::Ask);

    let initial_bids = volumes(&bids);
    let initial_asks = volumes(&asks);
    let total_initial = bids.total_volume() + asks.total_volume();

    let trades = find_best_arbitrage(&mut bids, &mut asks);

    assert!(trades.len() as u128 <= total_initial, "seed {}", seed);

    for t in &trades {
        assert_ne!(t.buy.venue, t.sell.venue, "seed {}", seed);
        assert!(t.profit_per_unit > 0.0, "seed {}", seed);
        assert!(t.quantity >= 1, "seed {}", seed);
        assert!((t.net_profit - t.profit_per_unit * t.quantity as f64).abs() < 1e-12);
    }

    for pair in trades.windows(2) {
        assert!(
            pair[1].profit_per_unit <= pair[0].profit_per_unit,
            "seed {}: profit increased between rounds",
            seed
        );
    }

    for (book, initial, side) in [(&bids, &initial_bids, Side::Bid), (&asks, &initial_asks, Side::Ask)] {
        let used = consumed(&trades, side);
        for (id, quote) in book.iter() {
            let start = initial[&id];
            let taken = used.get(&id).copied().unwrap_or(0);
            assert!(taken <= start, "seed {}: over-consumed {}", seed, id);
            assert_eq!(quote.volume(), start - taken, "seed {}", seed);
        }
    }

    // Whatever is left must not contain a profitable cross-venue pair
    let leftover = find_best_arbitrage(&mut bids, &mut asks);
    assert!(leftover.is_empty(), "seed {}", seed);
}

#[test]
fn test_invariants_hold_on_random_books() {
    for seed in 0..200 {
        assert_invariants(seed);
    }
}

#[test]
fn test_sample_books_full_run() {
    let (mut bids, mut asks) = sample_books().unwrap();

    let trades = find_best_arbitrage(&mut bids, &mut asks);

    let legs: Vec<(&str, &str, u64)> = trades
        .iter()
        .map(|t| (t.buy.venue.as_str(), t.sell.venue.as_str(), t.quantity))
        .collect();
    assert_eq!(
        legs,
        vec![
            ("ex5", "ex4", 3),
            ("ex1", "ex4", 1),
            ("ex1", "ex3", 5),
            ("ex1", "ex2", 10),
        ]
    );

    let ppu: Vec<f64> = trades.iter().map(|t| t.profit_per_unit).collect();
    let expected = [0.059745, 0.0595146, 0.0395696, 0.0192796];
    for (got, want) in ppu.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{} vs {}", got, want);
    }
    assert!((total_net_profit(&trades) - 0.6293936).abs() < 1e-9);

    let remaining = |book: &QuoteBook, venue: &str| {
        book.iter()
            .find(|(_, q)| q.venue() == venue)
            .map(|(_, q)| q.volume())
            .unwrap()
    };
    assert_eq!(remaining(&asks, "ex1"), 34);
    assert_eq!(remaining(&asks, "ex5"), 0);
    assert_eq!(remaining(&bids, "ex2"), 0);
    assert_eq!(remaining(&bids, "ex3"), 0);
    assert_eq!(remaining(&bids, "ex4"), 0);
    assert_eq!(remaining(&bids, "ex1"), 10);
    assert_eq!(remaining(&bids, "ex5"), 11);
}

#[test]
fn test_profits_strictly_decrease_across_rounds() {
    let mut asks = QuoteBook::new(
        Side::Ask,
        vec![
            Quote::new("ex1", 0.0, 1.00, 2).unwrap(),
            Quote::new("ex2", 0.0, 1.10, 2).unwrap(),
            Quote::new("ex3", 0.0, 1.20, 2).unwrap(),
        ],
    )
    .unwrap();
    let mut bids = QuoteBook::new(Side::Bid, vec![Quote::new("ex4", 0.0, 1.50, 6).unwrap()]).unwrap();

    let trades = find_best_arbitrage(&mut bids, &mut asks);

    assert_eq!(trades.len(), 3);
    assert!(trades[0].profit_per_unit > trades[1].profit_per_unit);
    assert!(trades[1].profit_per_unit > trades[2].profit_per_unit);
    assert_eq!(bids.total_volume(), 0);
}

#[test]
fn test_no_opportunity_leaves_books_untouched() {
    let raw_asks: RawBook = [("ex1-0.001".to_string(), (1.05, 10)), ("ex2-0".to_string(), (1.02, 4))]
        .into_iter()
        .collect();
    let raw_bids: RawBook = [("ex3-0.001".to_string(), (1.00, 10)), ("ex4-0".to_string(), (1.01, 7))]
        .into_iter()
        .collect();

    let mut asks = build_book(Side::Ask, &raw_asks).unwrap();
    let mut bids = build_book(Side::Bid, &raw_bids).unwrap();
    let before = (volumes(&bids), volumes(&asks));

    let outcome = ArbitrageMatcher::new(MatcherConfig::default()).run(&mut bids, &mut asks);

    assert!(outcome.trades.is_empty());
    assert!(!outcome.truncated);
    assert_eq!(outcome.total_net_profit(), 0.0);
    assert_eq!((volumes(&bids), volumes(&asks)), before);
}

#[test]
fn test_empty_books() {
    let mut bids = QuoteBook::new(Side::Bid, Vec::new()).unwrap();
    let mut asks = QuoteBook::new(Side::Ask, Vec::new()).unwrap();

    assert!(find_best_arbitrage(&mut bids, &mut asks).is_empty());
}

#[test]
fn test_invalid_input_rejected_before_matching() {
    let mut raw: RawBook = RawBook::new();
    raw.insert("ex1-0.0005".to_string(), (0.98, -1));
    assert!(matches!(
        build_book(Side::Bid, &raw),
        Err(MatchError::InvalidQuote { .. })
    ));

    let duplicate = QuoteBook::new(
        Side::Ask,
        vec![
            Quote::new("ex1", 0.0002, 1.0, 3).unwrap(),
            Quote::new("ex1", 0.0002, 1.0, 9).unwrap(),
        ],
    );
    assert!(matches!(duplicate, Err(MatchError::AmbiguousIdentity { .. })));

    let mut raw: RawBook = RawBook::new();
    raw.insert("ex1".to_string(), (0.98, 1));
    assert!(matches!(
        build_book(Side::Ask, &raw),
        Err(MatchError::MalformedKey { .. })
    ));
}

#[test]
fn test_capped_run_can_resume() {
    let (mut bids, mut asks) = sample_books().unwrap();
    let capped = ArbitrageMatcher::new(MatcherConfig {
        max_rounds: Some(2),
        min_profit_per_unit: 0.0,
    });

    let first = capped.run(&mut bids, &mut asks);
    assert_eq!(first.rounds(), 2);
    assert!(first.truncated);

    let rest = find_best_arbitrage(&mut bids, &mut asks);
    assert_eq!(rest.len(), 2);
    assert!(
        (first.total_net_profit() + total_net_profit(&rest) - 0.6293936).abs() < 1e-9
    );
}

#[test]
fn test_bundled_book_file_matches_sample() {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("books")
        .join("sample.toml");
    let (mut file_bids, mut file_asks) = venue_arb::arbitrage::BookFile::load(&path)
        .unwrap()
        .into_books()
        .unwrap();
    let (mut bids, mut asks) = sample_books().unwrap();

    let from_file = find_best_arbitrage(&mut file_bids, &mut file_asks);
    let from_sample = find_best_arbitrage(&mut bids, &mut asks);
    assert_eq!(from_file, from_sample);
}
