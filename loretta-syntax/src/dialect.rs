//! Which lexical/syntactic features are active for a given Lua flavor.
//!
//! Loretta recognizes the union of all dialects' grammar at the token
//! level; `LuaDialect` narrows what the lexer and parser accept so, e.g.,
//! standard Lua 5.1 source does not silently accept a `//` integer-divide
//! operator that only exists from 5.3 onward.

/// A named bundle of feature switches for one Lua flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuaDialect {
    /// `//` integer division (5.3+).
    pub integer_division: bool,
    /// `& | ~ << >>` bitwise operators (5.3+).
    pub bitwise_operators: bool,
    /// `goto`/`::label::` (5.2+).
    pub goto_labels: bool,
    /// `local x <const>` / `<close>` attributes (5.4+).
    pub attributes: bool,
    /// The `continue` soft keyword (GLua/LuaJIT extension).
    pub continue_statement: bool,
    /// `\` line continuation inside short strings.
    pub string_continuation: bool,
    /// `0x1p4`-style hexadecimal float literals.
    pub hex_float_literals: bool,
}

impl LuaDialect {
    pub const fn lua51() -> Self {
        LuaDialect {
            integer_division: false,
            bitwise_operators: false,
            goto_labels: false,
            attributes: false,
            continue_statement: false,
            string_continuation: true,
            hex_float_literals: false,
        }
    }

    pub const fn lua52() -> Self {
        LuaDialect { goto_labels: true, ..Self::lua51() }
    }

    pub const fn lua53() -> Self {
        LuaDialect { integer_division: true, bitwise_operators: true, hex_float_literals: true, ..Self::lua52() }
    }

    pub const fn lua54() -> Self {
        LuaDialect { attributes: true, ..Self::lua53() }
    }

    /// LuaJIT targets the 5.1 grammar plus its own `continue` extension
    /// and hex float literals from its bitop/FFI-adjacent tooling.
    pub const fn luajit() -> Self {
        LuaDialect { continue_statement: true, hex_float_literals: true, ..Self::lua51() }
    }

    /// GMod's GLua: 5.1 grammar, `continue`, and goto labels backported.
    pub const fn glua() -> Self {
        LuaDialect { continue_statement: true, goto_labels: true, ..Self::lua51() }
    }

    /// FiveM's Lua runtime tracks GLua's lexical surface.
    pub const fn fivem() -> Self {
        Self::glua()
    }
}

impl Default for LuaDialect {
    /// Defaults to Lua 5.4, the most feature-complete standard dialect.
    fn default() -> Self {
        Self::lua54()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lua51_has_no_post_5_1_features() {
        let d = LuaDialect::lua51();
        assert!(!d.integer_division);
        assert!(!d.bitwise_operators);
        assert!(!d.goto_labels);
        assert!(!d.attributes);
    }

    #[test]
    fn lua54_has_everything_standard() {
        let d = LuaDialect::lua54();
        assert!(d.integer_division);
        assert!(d.bitwise_operators);
        assert!(d.goto_labels);
        assert!(d.attributes);
    }

    #[test]
    fn glua_and_fivem_share_continue_and_goto() {
        assert_eq!(LuaDialect::glua(), LuaDialect::fivem());
        assert!(LuaDialect::glua().continue_statement);
        assert!(LuaDialect::glua().goto_labels);
        assert!(!LuaDialect::glua().bitwise_operators);
    }

    #[test]
    fn luajit_has_continue_but_not_goto() {
        let d = LuaDialect::luajit();
        assert!(d.continue_statement);
        assert!(!d.goto_labels);
    }
}
