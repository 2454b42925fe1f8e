use super::*;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;

type Hit = (usize, usize, String);

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Small alphabet so keys share prefixes and the trie branches
    prop::collection::vec(prop::sample::select(&b"abcxyz\x00\xff"[..]), 0..=12)
}

fn entries_strategy() -> impl Strategy<Value = Vec<(Vec<u8>, u64)>> {
    prop::collection::vec((key_strategy(), 1u64..u64::MAX), 0..=200)
}

fn export_inline(t: &ByteTrie<u64>) -> Vec<u8> {
    let mut out: FileStore<u64, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
    t.store_trie(&InlineCodec::<u64>::new(), &MmapTrieCodec, &mut out)
        .unwrap();
    out.finish().unwrap().into_inner()
}

fn export_strings<N: MutNode<Data = String>>(t: &Ptrie<SimpleStore<N>>) -> Vec<u8> {
    let mut out: FileStore<u32, _> = FileStore::new(Cursor::new(Vec::new())).unwrap();
    t.store_trie(&StringCodec, &MmapTrieCodec, &mut out).unwrap();
    out.finish().unwrap().into_inner()
}

fn payloads<S>(t: &Ptrie<S>) -> Vec<(Vec<u8>, u64)>
where
    S: NodeStore<Data = u64>,
{
    let mut out = Vec::new();
    t.foreach(Dir::Down, |key, node, _| {
        if *node.data() != 0 {
            out.push((key.to_vec(), *node.data()));
        }
        Ok(())
    })
    .unwrap();
    out
}

fn naive_scan(patterns: &BTreeSet<String>, text: &str) -> Vec<Hit> {
    let mut out = Vec::new();
    for p in patterns {
        // Overlapping occurrences count
        let mut from = 0;
        while let Some(i) = text[from..].find(p.as_str()) {
            let at = from + i;
            out.push((at, at + p.len(), p.clone()));
            from = at + 1;
        }
    }
    out.sort();
    out
}

fn scan_mutable(t: &ByteAcTrie<String>, text: &str) -> Vec<Hit> {
    let mut hits = Vec::new();
    t.fold_full(text.as_bytes(), &mut hits, |hits, data, _, span| {
        if !data.is_empty() {
            hits.push((span.begin, span.end, data.clone()));
        }
        Ok(true)
    })
    .unwrap();
    hits.sort();
    hits
}

fn scan_mapped(t: &FlatTrie<Vec<u8>, PNodeSsRo<u32, u32, Bytes>>, text: &str) -> Vec<Hit> {
    let mut hits = Vec::new();
    t.fold_full(text.as_bytes(), &mut hits, |hits, off, store, span| {
        if *off != 0 {
            let s = String::from_utf8_lossy(store.c_str(*off)?).into_owned();
            hits.push((span.begin, span.end, s));
        }
        Ok(true)
    })
    .unwrap();
    hits.sort();
    hits
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_store_matches_btreemap(entries in entries_strategy()) {
        let mut t: ByteTrie<u64> = ByteTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for (k, v) in &entries {
            t.store(k, *v).unwrap();
            m.insert(k.clone(), *v);
        }

        // Pre-order with children in byte order is lexicographic key order
        let expected: Vec<(Vec<u8>, u64)> = m.into_iter().collect();
        prop_assert_eq!(payloads(&t), expected.clone());

        for (k, v) in &expected {
            prop_assert_eq!(t.lookup(k, |d| *d == 0).unwrap(), Some(*v));
        }
    }

    #[test]
    fn prop_export_round_trip(entries in entries_strategy(), queries in prop::collection::vec(key_strategy(), 0..=32)) {
        let mut t: ByteTrie<u64> = ByteTrie::new();
        for (k, v) in &entries {
            t.store(k, *v).unwrap();
        }

        let bytes = export_inline(&t);
        let mapped: FlatTrie<Vec<u8>, PNodeRo<u64, u64, Bytes>> =
            FlatTrie::from_region(bytes, |r| MmapTrieCodec.find_root(r)).unwrap();

        prop_assert_eq!(payloads(&mapped), payloads(&t));
        for q in &queries {
            prop_assert_eq!(
                mapped.lookup(q, |d| *d == 0).unwrap(),
                t.lookup(q, |d| *d == 0).unwrap()
            );
        }
    }

    #[test]
    fn prop_scan_finds_every_occurrence(
        patterns in prop::collection::btree_set("[abc]{1,5}", 1..=12),
        text in "[abcd]{0,64}",
    ) {
        let mut t: ByteAcTrie<String> = ByteAcTrie::new();
        for p in &patterns {
            t.store(p.as_bytes(), p.clone()).unwrap();
        }
        t.make_links().unwrap();

        let expected = naive_scan(&patterns, &text);
        prop_assert_eq!(scan_mutable(&t, &text), expected.clone());

        let mapped: FlatTrie<Vec<u8>, PNodeSsRo<u32, u32, Bytes>> =
            FlatTrie::from_region(export_strings(&t), |r| MmapTrieCodec.find_root(r)).unwrap();
        prop_assert_eq!(scan_mapped(&mapped, &text), expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_gives_identical_export() {
    let keys = ["a", "ab", "b", "ba", "abc", "c"];

    let mut first: Option<Vec<u8>> = None;
    for_each_permutation(&keys, |perm| {
        let mut t: ByteAcTrie<String> = ByteAcTrie::new();
        for k in perm {
            t.store(k.as_bytes(), k.to_string()).unwrap();
        }
        t.make_links().unwrap();
        let bytes = export_strings(&t);
        match &first {
            Some(f) => assert_eq!(f, &bytes),
            None => first = Some(bytes),
        }
    });
}

#[test]
fn exhaustive_clear_then_rebuild() {
    let keys = ["1", "12", "123", "2", "21"];

    for_each_permutation(&keys, |perm| {
        let mut t: DigitTrie<String> = DigitTrie::new();
        for k in &keys {
            t.store(k.as_bytes(), "stale".into()).unwrap();
        }
        t.clear();
        for k in &perm {
            t.store(k.as_bytes(), k.to_string()).unwrap();
        }
        assert_eq!(t.node_store().count(), 6);

        let mut seen = Vec::new();
        t.foreach(Dir::Down, |key, node, _| {
            if !node.data().is_empty() {
                seen.push(String::from_utf8(key.to_vec()).unwrap());
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["1", "12", "123", "2", "21"]);
    });
}
