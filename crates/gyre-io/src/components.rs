//! Vector component naming.
//!
//! A vector is persisted as three scalar fields. The component names
//! encode the basis: covariant `V` becomes `V_x`, `V_y`, `V_z`;
//! contravariant `V` becomes `Vx`, `Vy`, `Vz`. Readers pick the suffix
//! convention from the registered covariance flag, so the two bases of
//! one vector never collide in a file.

/// The three on-disk component names for a vector.
pub fn component_names(base: &str, covariant: bool) -> [String; 3] {
    if covariant {
        [
            format!("{base}_x"),
            format!("{base}_y"),
            format!("{base}_z"),
        ]
    } else {
        [format!("{base}x"), format!("{base}y"), format!("{base}z")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn covariant_names_use_underscore_suffix() {
        assert_eq!(
            component_names("B", true),
            ["B_x".to_string(), "B_y".to_string(), "B_z".to_string()]
        );
    }

    #[test]
    fn contravariant_names_use_bare_suffix() {
        assert_eq!(
            component_names("B", false),
            ["Bx".to_string(), "By".to_string(), "Bz".to_string()]
        );
    }

    proptest! {
        /// The two naming regimes never produce the same set of names
        /// for one base, so both bases of a vector can coexist in a file.
        #[test]
        fn regimes_are_disjoint(base in "[A-Za-z][A-Za-z0-9]{0,12}") {
            let covariant = component_names(&base, true);
            let contravariant = component_names(&base, false);
            for name in &covariant {
                prop_assert!(!contravariant.contains(name));
            }
        }
    }
}
