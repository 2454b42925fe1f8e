//! Build a suffix-linked trie, export it, and scan text through the mapping.
//!
//! ```text
//! RUST_LOG=ptrie=debug cargo run --example actrie_export -- "ushers and his sheep"
//! ```

use ptrie::{ByteAcTrie, MappedByteAcTrie, Result, StringCodec};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ushers and his sheep".to_string());

    let mut trie: ByteAcTrie<String> = ByteAcTrie::new();
    for word in ["he", "she", "his", "hers"] {
        trie.store(word.as_bytes(), word.to_string())?;
    }
    trie.make_links()?;

    let path = std::env::temp_dir().join("actrie_export.trie");
    trie.write_to_file::<u32, _>(&path, &StringCodec)?;

    let mapped: MappedByteAcTrie = MappedByteAcTrie::open(&path)?;
    tracing::info!(path = %path.display(), bytes = mapped.len(), "scanning");

    let mut hits = Vec::new();
    mapped.fold_full(text.as_bytes(), &mut hits, |hits, off, store, span| {
        if *off != 0 {
            let word = String::from_utf8_lossy(store.c_str(*off)?).into_owned();
            hits.push((span.begin, span.end, word));
        }
        Ok(true)
    })?;

    for (begin, end, word) in &hits {
        println!("{begin:>4}..{end:<4} {word}");
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
