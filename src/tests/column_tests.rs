// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use crate::test_utils::config_test_logger;
    use crate::column::{Column, ColumnType, ConstantColumn, FixedStringColumn, StringColumn, UInt8Column};
    use crate::types::ColmatchError;

    // =============================================================================
    //  VARIABLE-LENGTH STRING COLUMNS
    // =============================================================================

    #[test]
    fn test_string_column_roundtrip() {
        config_test_logger();
        let column = StringColumn::from_values(&["hello", "", "abc"]);

        assert_eq!(column.len(), 3);
        assert!(!column.is_empty());
        assert_eq!(column.value(0), b"hello");
        assert_eq!(column.value(1), b"");
        assert_eq!(column.value(2), b"abc");
    }

    #[test]
    fn test_string_column_empty() {
        let column = StringColumn::new();
        assert_eq!(column.len(), 0);
        assert!(column.is_empty());
    }

    #[test]
    fn test_string_column_push() {
        let mut column = StringColumn::new();
        column.push(b"first");
        column.push(b"");
        column.push(b"second");

        assert_eq!(column.len(), 3);
        assert_eq!(column.value(0), b"first");
        assert_eq!(column.value(1), b"");
        assert_eq!(column.value(2), b"second");
    }

    // =============================================================================
    //  FIXED-WIDTH STRING COLUMNS
    // =============================================================================

    #[test]
    fn test_fixed_column_exact_width() {
        let column = FixedStringColumn::from_values(3, &["foo", "bar"]).unwrap();

        assert_eq!(column.width(), 3);
        assert_eq!(column.len(), 2);
        assert_eq!(column.value(0), b"foo");
        assert_eq!(column.value(1), b"bar");
    }

    #[test]
    fn test_fixed_column_pads_short_values() {
        let column = FixedStringColumn::from_values(5, &["abc", ""]).unwrap();

        assert_eq!(column.len(), 2);
        assert_eq!(column.value(0), b"abc\0\0");
        assert_eq!(column.value(1), b"\0\0\0\0\0");
    }

    #[test]
    fn test_fixed_column_rejects_oversized_value() {
        let result = FixedStringColumn::from_values(3, &["toolong"]);
        assert!(
            matches!(result, Err(ColmatchError::Internal(_))),
            "oversized value must be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_fixed_column_rejects_zero_width() {
        let result = FixedStringColumn::new(0);
        assert!(
            matches!(result, Err(ColmatchError::Internal(_))),
            "zero width must be rejected, got {:?}",
            result
        );
    }

    // =============================================================================
    //  CONSTANT COLUMNS
    // =============================================================================

    #[test]
    fn test_constant_column_wraps_one_row_string() {
        let inner = Column::String(StringColumn::from_values(&["broadcast"]));
        let constant = ConstantColumn::new(inner, 100).unwrap();

        assert_eq!(constant.len(), 100);
        assert_eq!(constant.inner().len(), 1);
    }

    #[test]
    fn test_constant_column_wraps_one_row_fixed() {
        let inner = Column::FixedString(FixedStringColumn::from_values(4, &["fix"]).unwrap());
        let constant = ConstantColumn::new(inner, 7).unwrap();

        assert_eq!(constant.len(), 7);
        assert_eq!(constant.inner().column_type(), ColumnType::FixedString);
    }

    #[test]
    fn test_constant_column_rejects_multi_row_inner() {
        let inner = Column::String(StringColumn::from_values(&["a", "b"]));
        let result = ConstantColumn::new(inner, 2);
        assert!(
            matches!(result, Err(ColmatchError::Internal(_))),
            "multi-row inner column must be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_constant_column_rejects_non_string_inner() {
        let inner = Column::UInt8(UInt8Column::from_vec(vec![1]));
        let result = ConstantColumn::new(inner, 1);
        assert!(
            matches!(result, Err(ColmatchError::Internal(_))),
            "non-string-like inner column must be rejected, got {:?}",
            result
        );
    }

    // =============================================================================
    //  LOGICAL TYPES
    // =============================================================================

    #[test]
    fn test_column_type_of_constant_is_inner_type() {
        let inner = Column::String(StringColumn::from_values(&["v"]));
        let constant = Column::Constant(ConstantColumn::new(inner, 10).unwrap());

        assert_eq!(constant.column_type(), ColumnType::String);
        assert_eq!(constant.len(), 10);
    }

    #[test]
    fn test_string_likeness() {
        assert!(ColumnType::String.is_string_like());
        assert!(ColumnType::FixedString.is_string_like());
        assert!(!ColumnType::UInt8.is_string_like());
    }

    #[test]
    fn test_uint8_column_accessors() {
        let column = UInt8Column::from_vec(vec![1, 0, 1]);

        assert_eq!(column.len(), 3);
        assert_eq!(column.as_slice(), &[1, 0, 1]);
        assert_eq!(column.value(1), 0);
        assert!(!column.is_empty());
    }
}
