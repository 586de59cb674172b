use reql::{ReqlError, Term, TermType, Value, r};
use proptest::prelude::*;
use serde_json::json;

fn arb_scalar() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<u64>().prop_map(serde_json::Value::from),
        (-1e12f64..1e12).prop_map(serde_json::Value::from),
        "[a-z0-9 \"\\\\]{0,12}".prop_map(serde_json::Value::from),
    ]
}

fn arb_op() -> impl Strategy<Value = TermType> {
    prop::sample::select(TermType::ALL.to_vec())
        .prop_filter("MAKE_OBJ has its own encoding", |op| *op != TermType::MakeObj)
}

fn arb_args() -> impl Strategy<Value = Vec<serde_json::Value>> {
    prop::collection::vec(arb_scalar(), 0..6)
}

proptest! {
    #[test]
    fn scalar_round_trip(v in arb_scalar()) {
        let t = r::expr(v.clone()).expect("scalars lift");
        prop_assert!(t.is_datum());
        prop_assert_eq!(t.to_json().unwrap(), v);
    }

    #[test]
    fn arrays_keep_order(items in arb_args()) {
        let t = r::expr(items.clone()).expect("arrays lift");
        prop_assert_eq!(t.to_json().unwrap(), json!([2, items]));
    }

    #[test]
    fn chaining_prepends_receiver(op in arb_op(), args in arb_args()) {
        let receiver = r::table("t").unwrap();
        let direct = Term::new(op, args.clone()).unwrap();
        let chained = receiver.apply(op, args.clone()).unwrap();

        let mut expected = direct.to_json().unwrap();
        expected[1]
            .as_array_mut()
            .unwrap()
            .insert(0, receiver.to_json().unwrap());
        prop_assert_eq!(chained.to_json().unwrap(), expected);

        let mut with_receiver = vec![Value::from(&receiver)];
        with_receiver.extend(args.into_iter().map(Value::from));
        let flat = Term::new(op, with_receiver).unwrap();
        prop_assert_eq!(chained.to_wire_bytes().unwrap(), flat.to_wire_bytes().unwrap());
    }

    #[test]
    fn serialization_is_deterministic(op in arb_op(), args in arb_args()) {
        let t = r::table("t").unwrap().apply(op, args).unwrap();
        prop_assert_eq!(t.to_wire_bytes().unwrap(), t.to_wire_bytes().unwrap());
    }

    #[test]
    fn non_finite_floats_fail_atomically(
        prefix in arb_args(),
        bad in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ) {
        let mut args: Vec<Value> = prefix.into_iter().map(Value::from).collect();
        args.push(Value::Float(bad));
        let result = Term::new(TermType::MakeArray, args);
        prop_assert!(matches!(result, Err(ReqlError::InvalidArgument(_))));
    }
}
