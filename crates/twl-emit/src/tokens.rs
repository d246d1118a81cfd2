//! Template token substitution.
//!
//! Each template slot recognizes a closed token set for one call site:
//! function-level tokens for the entry/exit/alloc/header slots, argument
//! tokens for the arg-trace slot, return tokens for the ret-trace slot.
//! Tokens absent from a template, or not recognized by its slot, are left
//! untouched.

use twl_model::Signature;

/// A placeholder token recognized somewhere in the template table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    FuncName,
    FuncIndex,
    FuncLabel,
    FuncDataSize,
    FuncDataEntrySize,
    FuncDataRetSize,
    ArgNum,
    ArgType,
    ArgSize,
    ArgLabel,
    RetType,
    RetSize,
    RetLabel,
}

impl Token {
    /// The marker text as it appears in templates.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::FuncName => "@FUNC_NAME@",
            Self::FuncIndex => "@FUNC_INDEX@",
            Self::FuncLabel => "@FUNC_LABEL@",
            Self::FuncDataSize => "@FUNC_DATA_SIZE@",
            Self::FuncDataEntrySize => "@FUNC_DATA_ENTRY_SIZE@",
            Self::FuncDataRetSize => "@FUNC_DATA_RET_SIZE@",
            Self::ArgNum => "@ARG_NUM@",
            Self::ArgType => "@ARG_TYPE@",
            Self::ArgSize => "@ARG_SIZE@",
            Self::ArgLabel => "@ARG_LABEL@",
            Self::RetType => "@RET_TYPE@",
            Self::RetSize => "@RET_SIZE@",
            Self::RetLabel => "@RET_LABEL@",
        }
    }
}

/// Expand the function-level tokens for one trace.
///
/// With `entry_reserve` set, the entry-size macro carries a fixed
/// four-word reservation for the trace record header fields.
#[must_use]
pub fn expand_func(template: &str, sig: &Signature, index: usize, entry_reserve: bool) -> String {
    let entry_size = if entry_reserve {
        format!("FUNC_DATA_ENTRY_SIZE_{} + (4 * sizeof(uint32_t))", sig.name)
    } else {
        format!("FUNC_DATA_ENTRY_SIZE_{}", sig.name)
    };
    template
        .replace(Token::FuncName.marker(), &format!("\"{}\"", sig.name))
        .replace(Token::FuncIndex.marker(), &index.to_string())
        .replace(Token::FuncLabel.marker(), &sig.name)
        .replace(
            Token::FuncDataSize.marker(),
            &format!("FUNC_DATA_SIZE_{}", sig.name),
        )
        .replace(Token::FuncDataEntrySize.marker(), &entry_size)
        .replace(
            Token::FuncDataRetSize.marker(),
            &format!("FUNC_DATA_RET_SIZE_{}", sig.name),
        )
}

/// Expand the argument tokens for one argument. `num` is 1-based.
#[must_use]
pub fn expand_arg(template: &str, arg_type: &str, num: usize) -> String {
    template
        .replace(Token::ArgNum.marker(), &num.to_string())
        .replace(Token::ArgType.marker(), &format!("\"{arg_type}\""))
        .replace(Token::ArgSize.marker(), &format!("sizeof({arg_type})"))
        .replace(Token::ArgLabel.marker(), &format!("a{num}"))
}

/// Expand the return-value tokens.
#[must_use]
pub fn expand_ret(template: &str, ret_type: &str) -> String {
    template
        .replace(Token::RetType.marker(), &format!("\"{ret_type}\""))
        .replace(Token::RetSize.marker(), &format!("sizeof({ret_type})"))
        .replace(Token::RetLabel.marker(), "ret")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig() -> Signature {
        Signature::new("open", vec!["const char*".into(), "int".into()], "int")
    }

    #[test]
    fn test_expand_func() {
        let out = expand_func(
            "trace(@FUNC_NAME@, @FUNC_INDEX@, &@FUNC_LABEL@, @FUNC_DATA_SIZE@);",
            &sig(),
            3,
            false,
        );
        assert_eq!(out, "trace(\"open\", 3, &open, FUNC_DATA_SIZE_open);");
    }

    #[test]
    fn test_expand_func_entry_reserve() {
        let out = expand_func("alloc(@FUNC_DATA_ENTRY_SIZE@);", &sig(), 0, true);
        assert_eq!(
            out,
            "alloc(FUNC_DATA_ENTRY_SIZE_open + (4 * sizeof(uint32_t)));"
        );

        let out = expand_func("alloc(@FUNC_DATA_ENTRY_SIZE@);", &sig(), 0, false);
        assert_eq!(out, "alloc(FUNC_DATA_ENTRY_SIZE_open);");
    }

    #[test]
    fn test_expand_func_ret_size_macro() {
        let out = expand_func("r(@FUNC_DATA_RET_SIZE@);", &sig(), 0, false);
        assert_eq!(out, "r(FUNC_DATA_RET_SIZE_open);");
    }

    #[test]
    fn test_expand_arg() {
        let out = expand_arg(
            "record(@ARG_NUM@, @ARG_TYPE@, @ARG_SIZE@, &@ARG_LABEL@);",
            "const char*",
            1,
        );
        assert_eq!(
            out,
            "record(1, \"const char*\", sizeof(const char*), &a1);"
        );
    }

    #[test]
    fn test_expand_ret() {
        let out = expand_ret("record(@RET_TYPE@, @RET_SIZE@, &@RET_LABEL@);", "int");
        assert_eq!(out, "record(\"int\", sizeof(int), &ret);");
    }

    #[test]
    fn test_unknown_tokens_left_alone() {
        let out = expand_func("x(@NOT_A_TOKEN@, @ARG_NUM@);", &sig(), 0, false);
        assert_eq!(out, "x(@NOT_A_TOKEN@, @ARG_NUM@);");
    }
}
