//! Property-based invariants of the match engine.

use proptest::prelude::*;

use routrie_core::{bool, float, int, root, string, Method};
use routrie_router::{get, Route, Router};

/// Four routes that diverge at the first segment; only the root node is
/// shared.
fn disjoint_route(idx: usize) -> Route<String> {
    match idx {
        0 => get(root().seg("a").capture(int()).end(), |n: i64| format!("a{n}")).unwrap(),
        1 => get(root().seg("b").capture(string()).end(), |s: String| format!("b{s}")).unwrap(),
        2 => get(root().seg("c").end(), || "c".to_string()).unwrap(),
        _ => get(root().seg("d").splat(), |rest: String| format!("d{rest}")).unwrap(),
    }
}

fn disjoint_router(order: &[usize]) -> Router<String> {
    Router::new(order.iter().map(|&i| disjoint_route(i)))
}

fn plausible_target() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|n| format!("/a/{n}")),
        "[a-z]{1,8}".prop_map(|s| format!("/b/{s}")),
        Just("/c".to_string()),
        "[a-z0-9/]{1,12}".prop_map(|s| format!("/d/{s}")),
        "[a-z/]{0,12}".prop_map(|s| format!("/{s}")),
    ]
}

proptest! {
    // Matching is a pure function of (router, method, target).
    #[test]
    fn determinism(target in plausible_target()) {
        let router = disjoint_router(&[0, 1, 2, 3]);
        let first = router.match_route(&Method::Get, &target);
        let second = router.match_route(&Method::Get, &target);
        prop_assert_eq!(first, second);
    }

    // Routes that share no node beyond the root are insensitive to
    // insertion order.
    #[test]
    fn insertion_order_independence(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        target in plausible_target(),
    ) {
        let reference = disjoint_router(&[0, 1, 2, 3]);
        let permuted = disjoint_router(&order);
        prop_assert_eq!(
            reference.match_route(&Method::Get, &target),
            permuted.match_route(&Method::Get, &target)
        );
    }

    // The handler receives exactly the decoded captures, path first,
    // then query, with the decoders' output types.
    #[test]
    fn typed_captures_arrive_in_declared_order(
        n in any::<i64>(),
        s in "[a-z]{1,8}",
        b in any::<bool>(),
    ) {
        let router = Router::new([get(
            root().seg("t").capture(int()).capture(string()).end().q("f", bool()),
            |n: i64, s: String, b: bool| format!("{n}|{s}|{b}"),
        )
        .unwrap()]);

        let target = format!("/t/{n}/{s}?f={b}");
        prop_assert_eq!(
            router.match_route(&Method::Get, &target),
            Some(format!("{n}|{s}|{b}"))
        );
    }

    // A literal segment always beats `:string` on its own text.
    #[test]
    fn exact_beats_typed(lit in "[a-z]{1,6}") {
        let router = Router::new([
            get(root().seg("x").seg(lit.clone()).end(), || "literal".to_string()).unwrap(),
            get(root().seg("x").capture(string()).end(), |_: String| "typed".to_string()).unwrap(),
        ]);

        let target = format!("/x/{lit}");
        let matched = router.match_route(&Method::Get, &target);
        prop_assert_eq!(matched.as_deref(), Some("literal"));
    }

    // int is preferred over float over string when several parse.
    #[test]
    fn numeric_specificity_int(n in any::<i64>()) {
        let router = specificity_router();
        let target = format!("/n/{n}");
        prop_assert_eq!(
            router.match_route(&Method::Get, &target),
            Some(format!("int:{n}"))
        );
    }

    #[test]
    fn numeric_specificity_float(whole in -1000i64..1000, frac in 1u32..1000) {
        let router = specificity_router();
        let token = format!("{whole}.{frac}");
        let target = format!("/n/{token}");
        let expected = format!("float:{}", token.parse::<f64>().unwrap());
        prop_assert_eq!(router.match_route(&Method::Get, &target), Some(expected));
    }

    #[test]
    fn numeric_specificity_string(
        word in "[a-z]{1,8}".prop_filter(
            "words f64's parser accepts",
            |w| w.parse::<f64>().is_err(),
        ),
    ) {
        let router = specificity_router();
        let target = format!("/n/{word}");
        prop_assert_eq!(
            router.match_route(&Method::Get, &target),
            Some(format!("string:{word}"))
        );
    }

    // Once a splat edge is selected, the capture is the remaining target
    // verbatim, query included.
    #[test]
    fn splat_absorbs_verbatim(
        suffix in "[a-z0-9/._-]{1,24}",
        query in proptest::option::of("[a-z]{1,4}=[a-z0-9]{0,4}"),
    ) {
        let router = Router::new([get(root().seg("s").splat(), |rest: String| rest).unwrap()]);

        let mut target = format!("/s/{suffix}");
        let mut expected = suffix.clone();
        if let Some(q) = &query {
            target.push('?');
            target.push_str(q);
            expected.push('?');
            expected.push_str(q);
        }
        prop_assert_eq!(router.match_route(&Method::Get, &target), Some(expected));
    }

    // Matching is invariant under permutation of request query
    // parameters.
    #[test]
    fn query_order_independence(
        section in any::<i64>(),
        flag in any::<bool>(),
        extra in "[a-z0-9]{0,6}",
    ) {
        let router = query_router();
        let params = [
            format!("section={section}"),
            format!("q={flag}"),
            format!("zz={extra}"),
        ];
        let forward = format!("/p/item?{}", params.join("&"));
        let mut reversed_params = params;
        reversed_params.reverse();
        let reversed = format!("/p/item?{}", reversed_params.join("&"));

        prop_assert_eq!(
            router.match_route(&Method::Get, &forward),
            router.match_route(&Method::Get, &reversed)
        );
        prop_assert!(router.match_route(&Method::Get, &forward).is_some());
    }

    // Extra request parameters never cause a mismatch.
    #[test]
    fn extra_query_tolerance(
        section in any::<i64>(),
        flag in any::<bool>(),
        extras in proptest::collection::vec("[m-z][a-z0-9]{0,5}=[a-z0-9]{0,5}", 0..4),
    ) {
        let router = query_router();
        let mut target = format!("/p/item?section={section}&q={flag}");
        for extra in &extras {
            target.push('&');
            target.push_str(extra);
        }
        prop_assert_eq!(
            router.match_route(&Method::Get, &target),
            Some(format!("item {section} {flag}"))
        );
    }
}

fn specificity_router() -> Router<String> {
    Router::new([
        get(root().seg("n").capture(int()).end(), |n: i64| format!("int:{n}")).unwrap(),
        get(root().seg("n").capture(float()).end(), |f: f64| format!("float:{f}")).unwrap(),
        get(root().seg("n").capture(string()).end(), |s: String| {
            format!("string:{s}")
        })
        .unwrap(),
    ])
}

fn query_router() -> Router<String> {
    Router::new([get(
        root()
            .seg("p")
            .capture(string())
            .end()
            .q("section", int())
            .q("q", bool()),
        |name: String, section: i64, flag: bool| format!("{name} {section} {flag}"),
    )
    .unwrap()])
}
