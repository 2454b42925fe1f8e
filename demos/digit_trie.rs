//! Build a digit trie, export it, and query the mapped file.
//!
//! ```text
//! cargo run --example digit_trie
//! ```

use ptrie::{DigitTrie, MappedDigitTrie, Result, StringCodec};

fn main() -> Result<()> {
    let mut trie: DigitTrie<String> = DigitTrie::new();
    trie.store(b"123", "three".into())?;
    trie.store(b"1234", "four".into())?;
    trie.store(b"12345", "five".into())?;

    let key = b"1234567";
    println!("in memory:");
    trie.fold(key, &mut (), |_, data, _, span| {
        if !data.is_empty() {
            println!("  {}..{} -> {}", span.begin, span.end, data);
        }
        Ok(true)
    })?;

    let dir = std::env::temp_dir();
    let path = dir.join("digit_trie.trie");
    let root: u32 = trie.write_to_file(&path, &StringCodec)?;
    println!("exported to {} (root at {root})", path.display());

    let mapped: MappedDigitTrie = MappedDigitTrie::open(&path)?;
    println!("mapped ({} bytes):", mapped.len());
    mapped.fold(key, &mut (), |_, off, store, span| {
        if *off != 0 {
            let name = String::from_utf8_lossy(store.c_str(*off)?);
            println!("  {}..{} -> {}", span.begin, span.end, name);
        }
        Ok(true)
    })?;

    let longest = mapped.lookup(key, |off| *off == 0)?;
    if let Some(off) = longest {
        let name = String::from_utf8_lossy(mapped.node_store().c_str(off)?).into_owned();
        println!("longest prefix of {}: {name}", String::from_utf8_lossy(key));
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
