use proptest::prelude::*;

use searchdoc::datatype::Value;
use searchdoc::{Clause, Codec, Document, Field, FuzzyParams, RangeParams, ScaledFloatParams, TextParams};

proptest! {
    #[test]
    fn integers_and_their_strings_agree(n in any::<i64>()) {
        prop_assert_eq!(Value::number(n).unwrap(), Value::Integer(n));
        prop_assert_eq!(Value::number(n.to_string()).unwrap(), Value::Integer(n));
        prop_assert_eq!(Value::string_number_or_time(n.to_string()).unwrap(), Value::Integer(n));
    }

    #[test]
    fn range_bounds_survive_both_formats(gte in any::<i64>(), lt in any::<i64>()) {
        let mut query: Document<Clause> = Document::new();
        query
            .add_params("n", RangeParams { greater_than_or_equal_to: gte.into(), less_than: lt.into(), ..Default::default() })
            .unwrap();
        for codec in [Codec::json(), Codec::binary()] {
            let bytes = codec.encode_document(&query).unwrap();
            let decoded: Document<Clause> = codec.decode_document(&bytes).unwrap();
            prop_assert_eq!(&decoded, &query);
        }
    }

    #[test]
    fn scaling_factor_survives_both_formats(factor in 1i32..1_000_000) {
        let mut mapping: Document<Field> = Document::new();
        mapping
            .add_params("price", ScaledFloatParams { scaling_factor: factor.into(), ..Default::default() })
            .unwrap();
        for codec in [Codec::json(), Codec::binary()] {
            let bytes = codec.encode_document(&mapping).unwrap();
            let decoded: Document<Field> = codec.decode_document(&bytes).unwrap();
            prop_assert_eq!(&decoded, &mapping);
        }
    }

    #[test]
    fn explicit_flags_survive_both_formats(norms: bool, index: bool, store: bool) {
        let mut mapping: Document<Field> = Document::new();
        mapping
            .add_params("title", TextParams { norms: norms.into(), index: index.into(), store: store.into(), ..Default::default() })
            .unwrap();
        for codec in [Codec::json(), Codec::binary()] {
            let bytes = codec.encode_document(&mapping).unwrap();
            let decoded: Document<Field> = codec.decode_document(&bytes).unwrap();
            prop_assert_eq!(&decoded, &mapping);
        }
    }

    #[test]
    fn explicit_boost_and_transpositions_survive(boost in 0i64..4, transpositions: bool) {
        let mut query: Document<Clause> = Document::new();
        query
            .add_params(
                "user",
                FuzzyParams { value: "ki".into(), boost: boost.into(), transpositions: transpositions.into(), ..Default::default() },
            )
            .unwrap();
        for codec in [Codec::json(), Codec::binary()] {
            let bytes = codec.encode_document(&query).unwrap();
            let decoded: Document<Clause> = codec.decode_document(&bytes).unwrap();
            prop_assert_eq!(&decoded, &query);
        }
    }

    #[test]
    fn size_limit_is_exact(extra in 0usize..64) {
        let mut mapping: Document<Field> = Document::new();
        mapping.add("created", searchdoc::DateField::new()).unwrap();
        let bytes = Codec::json().encode_document(&mapping).unwrap();
        let fits = Codec::json().with_max_bytes(bytes.len() + extra);
        prop_assert!(fits.decode_document::<Field>(&bytes).is_ok());
        let tight = Codec::json().with_max_bytes(bytes.len() - 1);
        prop_assert!(tight.decode_document::<Field>(&bytes).is_err());
    }
}
