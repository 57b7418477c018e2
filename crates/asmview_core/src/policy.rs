use crate::types::OutputFilters;

/// Force binary output for an assembly build and contribute no extra
/// assembler arguments. There is no textual compile stage to filter; the
/// presentable text is recovered later from the emitted binary.
pub fn apply_binary_filter(filters: &mut OutputFilters) -> Vec<String> {
    filters.binary = true;
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_is_forced_from_either_prior_state() {
        let mut filters = OutputFilters::default();
        assert!(!filters.binary);
        let extra = apply_binary_filter(&mut filters);
        assert!(filters.binary);
        assert!(extra.is_empty());

        let mut already = OutputFilters {
            binary: true,
            intel_syntax: true,
            demangle: true,
        };
        let extra = apply_binary_filter(&mut already);
        assert!(already.binary);
        assert!(already.intel_syntax);
        assert!(already.demangle);
        assert!(extra.is_empty());
    }
}
