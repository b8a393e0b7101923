//! Property tests for escaping, canonical form and fail-soft matching

use hekate_select::escape::{hide, reveal};
use hekate_select::{SelectorEngine, tokenize, tokenize_strict};
use proptest::collection::vec;
use proptest::prelude::*;

fn name_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("a"),
        Just("div"),
        Just("li"),
        Just("x"),
        Just("item-1"),
        Just("_tmp"),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn attribute_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("[data-x]".to_string()),
        Just(r#"[data-x="a b"]"#.to_string()),
        Just("[lang|=en]".to_string()),
        Just("[title='x, y' i]".to_string()),
        Just("[href^=http]".to_string()),
        Just("[title='] > ['][id~=z]".to_string()),
    ]
    .boxed()
}

fn compound_strategy() -> BoxedStrategy<String> {
    let leaf = prop_oneof![
        name_strategy(),
        name_strategy().prop_map(|n| format!(".{n}")),
        name_strategy().prop_map(|n| format!("#{n}")),
        (name_strategy(), attribute_strategy()).prop_map(|(n, a)| format!("{n}{a}")),
        Just(":first-child".to_string()),
        Just("li:nth-child(2n + 1)".to_string()),
        Just("*".to_string()),
    ]
    .boxed();

    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), name_strategy()).prop_map(|(c, n)| format!("{c}.{n}")),
            vec(inner.clone(), 1..=3).prop_map(|items| format!(":not({})", items.join(", "))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| format!("{a}:not({a} > {b})")),
        ]
    })
    .boxed()
}

fn combinator_strategy() -> BoxedStrategy<&'static str> {
    prop_oneof![
        Just(" "),
        Just("   "),
        Just("\t"),
        Just(">"),
        Just(" > "),
        Just("+"),
        Just(" +  "),
        Just("~"),
        Just("\n~ "),
    ]
    .boxed()
}

fn clause_strategy() -> BoxedStrategy<String> {
    (
        compound_strategy(),
        vec((combinator_strategy(), compound_strategy()), 0..=3),
    )
        .prop_map(|(head, rest)| {
            let mut clause = head;
            for (combinator, compound) in rest {
                clause.push_str(combinator);
                clause.push_str(&compound);
            }
            clause
        })
        .boxed()
}

fn nth_argument_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        any::<i32>().prop_map(|b| b.to_string()),
        (any::<i32>(), any::<i32>()).prop_map(|(a, b)| format!("{a}n{b:+}")),
        (any::<i32>(), any::<i32>()).prop_map(|(a, b)| format!("{a}n - {}", b.unsigned_abs())),
        prop_oneof![
            Just(i32::MIN),
            Just(i32::MAX),
            Just(-1),
            Just(0),
            Just(1)
        ]
        .prop_map(|b| format!("-n{b:+}")),
    ]
    .boxed()
}

fn selector_strategy() -> BoxedStrategy<String> {
    (
        vec(clause_strategy(), 1..=3),
        prop_oneof![Just(","), Just(", "), Just("  ,\t")],
        prop_oneof![Just(""), Just("  "), Just("\n")],
    )
        .prop_map(|(clauses, comma, pad)| format!("{pad}{}{pad}", clauses.join(comma)))
        .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn escaping_round_trips_arbitrary_text(s in any::<String>()) {
        prop_assert_eq!(reveal(&hide(&s)), s);
    }

    #[test]
    fn escaping_round_trips_selector_alphabet(s in "[a-c#.:,>+~ ()\\[\\]'\"=]{0,32}") {
        prop_assert_eq!(reveal(&hide(&s)), s);
    }

    #[test]
    fn canonical_form_is_idempotent(selector in selector_strategy()) {
        let once = tokenize(&selector).selector;
        let twice = tokenize(&once).selector;
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn generated_selectors_parse_strictly(selector in selector_strategy()) {
        let strict = tokenize_strict(&selector);
        prop_assert!(strict.is_ok(), "{:?} -> {:?}", selector, strict);
        let list = strict.unwrap();
        prop_assert_eq!(list, tokenize(&selector));
    }

    #[test]
    fn arbitrary_selectors_never_panic(s in "[a-c0-9#.:,>+~ ()\\[\\]'\"=*|^$!-]{0,32}") {
        let list = tokenize(&s);
        let _ = tokenize_strict(&s);
        let doc = hekate_html::parse("<div id=a class=b><p title=c>x</p></div>").unwrap();
        let engine = SelectorEngine::new();
        let result = engine.query_list(doc.tree(), &list, &[doc.tree().root()]);
        prop_assert!(result.elements.len() <= doc.tree().len());
    }

    #[test]
    fn nth_arguments_never_panic(
        pseudo in prop_oneof![Just("nth-child"), Just("nth-last-child")],
        arg in nth_argument_strategy()
    ) {
        let doc = hekate_html::parse("<ul><li>a</li><li>b</li><li>c</li></ul>").unwrap();
        let engine = SelectorEngine::new();
        let selector = format!("li:{pseudo}({arg})");
        let result = engine.query(doc.tree(), &selector, &[doc.tree().root()]);
        prop_assert!(result.elements.len() <= 3);
    }
}
