// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use crate::test_utils::config_test_logger;
    use crate::column::{Column, ConstantColumn, FixedStringColumn, StringColumn, UInt8Column};
    use crate::kernel::{scan_columns, ScalarEq, SourceKind};
    use crate::types::{ColmatchError, MatchMode};

    // =============================================================================
    //  HELPERS - COLUMN REPRESENTATIONS AND A REFERENCE MATCHER
    // =============================================================================

    /// A column plus the logical byte values it represents (after any
    /// fixed-width zero padding), so expectations can be computed per
    /// representation.
    type Represented = (Column, Vec<Vec<u8>>);

    fn plain_string(values: &[&str]) -> Represented {
        let column = Column::String(StringColumn::from_values(values));
        let logical = values.iter().map(|v| v.as_bytes().to_vec()).collect();
        (column, logical)
    }

    fn plain_fixed(values: &[&str], width: usize) -> Represented {
        let column = FixedStringColumn::from_values(width, values).unwrap();
        let logical = (0..column.len()).map(|i| column.value(i).to_vec()).collect();
        (Column::FixedString(column), logical)
    }

    fn const_string(value: &str, rows: usize) -> Represented {
        let inner = Column::String(StringColumn::from_values(&[value]));
        let column = Column::Constant(ConstantColumn::new(inner, rows).unwrap());
        (column, vec![value.as_bytes().to_vec(); rows])
    }

    fn const_fixed(value: &str, width: usize, rows: usize) -> Represented {
        let inner_column = FixedStringColumn::from_values(width, &[value]).unwrap();
        let logical = vec![inner_column.value(0).to_vec(); rows];
        let column =
            Column::Constant(ConstantColumn::new(Column::FixedString(inner_column), rows).unwrap());
        (column, logical)
    }

    /// Straightforward per-row matcher the kernel is checked against.
    fn reference(haystacks: &[Vec<u8>], needles: &[Vec<u8>], mode: MatchMode) -> Vec<u8> {
        haystacks
            .iter()
            .zip(needles)
            .map(|(hay, nee)| {
                let matched = match mode {
                    MatchMode::Prefix => hay.starts_with(nee),
                    MatchMode::Suffix => hay.ends_with(nee),
                };
                matched as u8
            })
            .collect()
    }

    fn run_scalar(haystack: &Column, needle: &Column, mode: MatchMode) -> Vec<u8> {
        let mut out = vec![0u8; haystack.len()];
        unsafe {
            scan_columns::<ScalarEq>(haystack, needle, mode, &mut out).unwrap();
        }
        out
    }

    // =============================================================================
    //  SOURCE KIND RESOLUTION
    // =============================================================================

    #[test]
    fn test_source_kind_resolution() {
        config_test_logger();
        let (string_col, _) = plain_string(&["a"]);
        let (fixed_col, _) = plain_fixed(&["a"], 1);
        let (const_string_col, _) = const_string("a", 1);
        let (const_fixed_col, _) = const_fixed("a", 1, 1);

        assert_eq!(SourceKind::resolve(&string_col), Some(SourceKind::Var));
        assert_eq!(SourceKind::resolve(&fixed_col), Some(SourceKind::Fixed));
        assert_eq!(
            SourceKind::resolve(&const_string_col),
            Some(SourceKind::ConstVar)
        );
        assert_eq!(
            SourceKind::resolve(&const_fixed_col),
            Some(SourceKind::ConstFixed)
        );
        assert_eq!(
            SourceKind::resolve(&Column::UInt8(UInt8Column::from_vec(vec![0]))),
            None
        );
    }

    #[test]
    fn test_unresolvable_column_is_illegal_combination() {
        let (haystack, _) = plain_string(&["a"]);
        let needle = Column::UInt8(UInt8Column::from_vec(vec![0]));
        let mut out = vec![0u8; 1];

        let result =
            unsafe { scan_columns::<ScalarEq>(&haystack, &needle, MatchMode::Prefix, &mut out) };
        assert!(
            matches!(result, Err(ColmatchError::IllegalColumnCombination(_))),
            "unresolvable storage kind must be a combination error, got {:?}",
            result
        );
    }

    // =============================================================================
    //  THE 16 SOURCE PAIRINGS
    // =============================================================================

    #[test]
    fn test_all_sixteen_source_pairings() {
        // Plain representations hold distinct rows; constant representations
        // broadcast one value over the same row count.
        let haystack_reps = vec![
            plain_string(&["hello", "help", "abc"]),
            plain_fixed(&["hello", "help", "abc"], 5),
            const_string("hello", 3),
            const_fixed("hello", 5, 3),
        ];
        let needle_reps = vec![
            plain_string(&["hel", "lp", ""]),
            plain_fixed(&["hel", "lp", ""], 3),
            const_string("hel", 3),
            const_fixed("hel", 3, 3),
        ];

        for (haystack, haystack_values) in &haystack_reps {
            for (needle, needle_values) in &needle_reps {
                for mode in [MatchMode::Prefix, MatchMode::Suffix] {
                    let out = run_scalar(haystack, needle, mode);
                    let expected = reference(haystack_values, needle_values, mode);
                    assert_eq!(
                        out, expected,
                        "pairing {:?} x {:?} mismatch in {:?} mode",
                        SourceKind::resolve(haystack),
                        SourceKind::resolve(needle),
                        mode
                    );
                }
            }
        }
    }

    // =============================================================================
    //  MATCHING LAWS
    // =============================================================================

    #[test]
    fn test_prefix_scenario() {
        let (haystack, _) = plain_string(&["hello", "abc"]);
        let (needle, _) = plain_string(&["he", "abcd"]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Prefix), [1, 0]);
    }

    #[test]
    fn test_suffix_scenario() {
        let (haystack, _) = plain_string(&["hello", "abc"]);
        let (needle, _) = plain_string(&["lo", "bc"]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Suffix), [1, 1]);
    }

    #[test]
    fn test_empty_needle_always_matches() {
        let (haystack, _) = plain_string(&["x"]);
        let (needle, _) = plain_string(&[""]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Prefix), [1]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Suffix), [1]);
    }

    #[test]
    fn test_longer_needle_never_matches() {
        let (haystack, _) = plain_string(&[""]);
        let (needle, _) = plain_string(&["a"]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Suffix), [0]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Prefix), [0]);
    }

    #[test]
    fn test_both_empty_matches() {
        // The empty-needle law dominates: equality of zero-length slices is
        // vacuously true.
        let (haystack, _) = plain_string(&[""]);
        let (needle, _) = plain_string(&[""]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Prefix), [1]);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Suffix), [1]);
    }

    #[test]
    fn test_fixed_haystack_with_constant_needle() {
        let (haystack, _) = plain_fixed(&["foo", "bar"], 3);
        let (needle, _) = const_string("fo", 2);
        assert_eq!(run_scalar(&haystack, &needle, MatchMode::Prefix), [1, 0]);
    }

    #[test]
    fn test_row_order_preservation() {
        let values = ["alpha", "beta", "gamma", "al"];
        let needles = ["al", "be", "ma", "alpha"];
        let (haystack, hvals) = plain_string(&values);
        let (needle, nvals) = plain_string(&needles);
        let original = run_scalar(&haystack, &needle, MatchMode::Prefix);
        assert_eq!(original, reference(&hvals, &nvals, MatchMode::Prefix));

        // Permuting rows permutes results identically
        let perm = [2usize, 0, 3, 1];
        let permuted_values: Vec<&str> = perm.iter().map(|&i| values[i]).collect();
        let permuted_needles: Vec<&str> = perm.iter().map(|&i| needles[i]).collect();
        let (haystack_p, _) = plain_string(&permuted_values);
        let (needle_p, _) = plain_string(&permuted_needles);
        let permuted = run_scalar(&haystack_p, &needle_p, MatchMode::Prefix);

        for (new_row, &old_row) in perm.iter().enumerate() {
            assert_eq!(
                permuted[new_row], original[old_row],
                "row {} must carry the result of original row {}",
                new_row, old_row
            );
        }
    }

    #[test]
    fn test_constant_broadcast_equivalence() {
        let rows = 6;
        let needles = ["pre", "prefix", "", "other", "prefixed!", "p"];
        let (needle, nvals) = plain_string(&needles);

        let (constant_haystack, cvals) = const_string("prefixed", rows);
        let repeated: Vec<&str> = std::iter::repeat("prefixed").take(rows).collect();
        let (plain_haystack, pvals) = plain_string(&repeated);
        assert_eq!(cvals, pvals);

        for mode in [MatchMode::Prefix, MatchMode::Suffix] {
            let from_constant = run_scalar(&constant_haystack, &needle, mode);
            let from_plain = run_scalar(&plain_haystack, &needle, mode);
            assert_eq!(
                from_constant, from_plain,
                "broadcast and materialized haystacks disagree in {:?} mode",
                mode
            );
            assert_eq!(from_plain, reference(&pvals, &nvals, mode));
        }
    }
}
