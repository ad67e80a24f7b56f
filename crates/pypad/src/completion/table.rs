//! The built-in Python symbol table.

use super::{Category, CompletionEntry};

const fn entry(symbol: &'static str, category: Category) -> CompletionEntry {
    CompletionEntry { symbol, category }
}

/// Python symbols in match priority order: keywords, then the most used
/// builtins, then the rest of the builtins, constants and common modules.
pub static PYTHON_SYMBOLS: &[CompletionEntry] = &[
    // Keywords
    entry("False", Category::Keyword),
    entry("None", Category::Keyword),
    entry("True", Category::Keyword),
    entry("and", Category::Keyword),
    entry("as", Category::Keyword),
    entry("assert", Category::Keyword),
    entry("async", Category::Keyword),
    entry("await", Category::Keyword),
    entry("break", Category::Keyword),
    entry("class", Category::Keyword),
    entry("continue", Category::Keyword),
    entry("def", Category::Keyword),
    entry("del", Category::Keyword),
    entry("elif", Category::Keyword),
    entry("else", Category::Keyword),
    entry("except", Category::Keyword),
    entry("finally", Category::Keyword),
    entry("for", Category::Keyword),
    entry("from", Category::Keyword),
    entry("global", Category::Keyword),
    entry("if", Category::Keyword),
    entry("import", Category::Keyword),
    entry("in", Category::Keyword),
    entry("is", Category::Keyword),
    entry("lambda", Category::Keyword),
    entry("nonlocal", Category::Keyword),
    entry("not", Category::Keyword),
    entry("or", Category::Keyword),
    entry("pass", Category::Keyword),
    entry("raise", Category::Keyword),
    entry("return", Category::Keyword),
    entry("try", Category::Keyword),
    entry("while", Category::Keyword),
    entry("with", Category::Keyword),
    entry("yield", Category::Keyword),
    // Builtin functions, most used first
    entry("print", Category::Function),
    entry("len", Category::Function),
    entry("range", Category::Function),
    entry("input", Category::Function),
    entry("int", Category::Class),
    entry("str", Category::Class),
    entry("float", Category::Class),
    entry("list", Category::Class),
    entry("dict", Category::Class),
    entry("set", Category::Class),
    entry("tuple", Category::Class),
    entry("bool", Category::Class),
    entry("enumerate", Category::Function),
    entry("zip", Category::Function),
    entry("sorted", Category::Function),
    entry("sum", Category::Function),
    entry("min", Category::Function),
    entry("max", Category::Function),
    entry("abs", Category::Function),
    entry("round", Category::Function),
    entry("open", Category::Function),
    entry("isinstance", Category::Function),
    entry("type", Category::Class),
    entry("map", Category::Function),
    entry("filter", Category::Function),
    // Remaining builtins
    entry("aiter", Category::Function),
    entry("all", Category::Function),
    entry("anext", Category::Function),
    entry("any", Category::Function),
    entry("ascii", Category::Function),
    entry("bin", Category::Function),
    entry("breakpoint", Category::Function),
    entry("bytearray", Category::Class),
    entry("bytes", Category::Class),
    entry("callable", Category::Function),
    entry("chr", Category::Function),
    entry("classmethod", Category::Class),
    entry("compile", Category::Function),
    entry("complex", Category::Class),
    entry("delattr", Category::Function),
    entry("dir", Category::Function),
    entry("divmod", Category::Function),
    entry("eval", Category::Function),
    entry("exec", Category::Function),
    entry("format", Category::Function),
    entry("frozenset", Category::Class),
    entry("getattr", Category::Function),
    entry("globals", Category::Function),
    entry("hasattr", Category::Function),
    entry("hash", Category::Function),
    entry("help", Category::Function),
    entry("hex", Category::Function),
    entry("id", Category::Function),
    entry("issubclass", Category::Function),
    entry("iter", Category::Function),
    entry("locals", Category::Function),
    entry("memoryview", Category::Class),
    entry("next", Category::Function),
    entry("object", Category::Class),
    entry("oct", Category::Function),
    entry("ord", Category::Function),
    entry("pow", Category::Function),
    entry("property", Category::Class),
    entry("repr", Category::Function),
    entry("reversed", Category::Class),
    entry("setattr", Category::Function),
    entry("slice", Category::Class),
    entry("staticmethod", Category::Class),
    entry("super", Category::Class),
    entry("vars", Category::Function),
    // Constants
    entry("Ellipsis", Category::Constant),
    entry("NotImplemented", Category::Constant),
    entry("__name__", Category::Constant),
    // Exceptions
    entry("Exception", Category::Class),
    entry("ValueError", Category::Class),
    entry("TypeError", Category::Class),
    entry("KeyError", Category::Class),
    entry("IndexError", Category::Class),
    entry("ZeroDivisionError", Category::Class),
    entry("RuntimeError", Category::Class),
    entry("StopIteration", Category::Class),
    // Modules
    entry("numpy", Category::Module),
    entry("pandas", Category::Module),
    entry("matplotlib", Category::Module),
    entry("math", Category::Module),
    entry("random", Category::Module),
    entry("datetime", Category::Module),
    entry("collections", Category::Module),
    entry("itertools", Category::Module),
    entry("functools", Category::Module),
    entry("json", Category::Module),
    entry("re", Category::Module),
    entry("os", Category::Module),
    entry("sys", Category::Module),
    entry("time", Category::Module),
    entry("statistics", Category::Module),
    entry("asyncio", Category::Module),
];
