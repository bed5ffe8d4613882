// Criterion benchmarks for addrstd.
//
// Uses the integration test fixtures (tests/fixtures/us.lex, us.gram).
//
// Run:
//   cargo bench -p addrstd

use std::path::PathBuf;
use std::sync::Arc;

use addrstd::{Grammar, Lexicon, Standardizer, Tokenizer};
use criterion::{Criterion, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load() -> (Arc<Lexicon>, Arc<Grammar>) {
    let lexicon = Lexicon::from_path(fixture("us.lex")).expect("failed to load us.lex");
    let grammar = Grammar::from_path(fixture("us.gram")).expect("failed to load us.gram");
    (Arc::new(lexicon), Arc::new(grammar))
}

const ADDRESSES: &[&str] = &[
    "11 Dackon Allee Podunk AL 12345",
    "45 N Main Ave Apt 3, Podunk, AL 12345",
    "100 St John St Boston MA 02101",
    "500 Oak Road West Springfield IL 62704",
    "7 Elm Street San Jose CA 95112",
    "PO Box 123 Podunk AL",
];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Compile the lexicon word list into its scanner regex from scratch.
fn bench_compile_lexicon(c: &mut Criterion) {
    let text = std::fs::read_to_string(fixture("us.lex")).expect("failed to read us.lex");
    c.bench_function("compile_lexicon", |b| {
        b.iter(|| std::hint::black_box(addrstd::handle::compile_lexicon(&text)));
    });
}

/// Tokenize the sample addresses with a warm scanner.
fn bench_tokenize(c: &mut Criterion) {
    let (lexicon, _) = load();
    let tokenizer = Tokenizer::new(&lexicon).expect("tokenizer");
    c.bench_function("tokenize_addresses", |b| {
        b.iter(|| {
            for address in ADDRESSES {
                std::hint::black_box(tokenizer.get_tokens(address));
            }
        });
    });
}

/// Full standardization: normalize, tokenize, enumerate, search, assemble.
fn bench_standardize(c: &mut Criterion) {
    let (lexicon, grammar) = load();
    let standardizer = Standardizer::new(lexicon, grammar).expect("standardizer");
    c.bench_function("standardize_addresses", |b| {
        b.iter(|| {
            for address in ADDRESSES {
                std::hint::black_box(standardizer.standardize(address));
            }
        });
    });
}

criterion_group!(benches, bench_compile_lexicon, bench_tokenize, bench_standardize);
criterion_main!(benches);
