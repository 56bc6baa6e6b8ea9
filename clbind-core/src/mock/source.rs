//! Kernel source scanning for the mock compiler.
//!
//! Only kernel signatures, `#include` lines, and `#error` directives are
//! recognized. Kernel bodies are never looked at.

use crate::ffi::{self, cl_uint, cl_bitfield};

/// A kernel argument declaration.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ArgDecl {
    pub name: String,
    pub type_name: String,
    pub address: cl_uint,
    pub access: cl_uint,
    pub type_qualifier: cl_bitfield,
}

impl ArgDecl {
    pub fn is_pointer(&self) -> bool {
        self.type_name.ends_with('*')
    }

    pub fn is_image(&self) -> bool {
        self.type_name.starts_with("image")
    }

    pub fn is_sampler(&self) -> bool {
        self.type_name == "sampler_t"
    }

    /// Returns true if the argument takes a memory object.
    pub fn is_mem(&self) -> bool {
        self.is_image() || (self.is_pointer() && self.address != ffi::CL_KERNEL_ARG_ADDRESS_LOCAL)
    }

    pub fn is_local(&self) -> bool {
        self.address == ffi::CL_KERNEL_ARG_ADDRESS_LOCAL
    }

    fn to_source(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(5);
        match self.address {
            ffi::CL_KERNEL_ARG_ADDRESS_GLOBAL if !self.is_image() => parts.push("__global"),
            ffi::CL_KERNEL_ARG_ADDRESS_LOCAL => parts.push("__local"),
            ffi::CL_KERNEL_ARG_ADDRESS_CONSTANT => parts.push("__constant"),
            _ => (),
        }
        match self.access {
            ffi::CL_KERNEL_ARG_ACCESS_READ_ONLY => parts.push("read_only"),
            ffi::CL_KERNEL_ARG_ACCESS_WRITE_ONLY => parts.push("write_only"),
            ffi::CL_KERNEL_ARG_ACCESS_READ_WRITE => parts.push("read_write"),
            _ => (),
        }
        if self.type_qualifier & ffi::CL_KERNEL_ARG_TYPE_CONST != 0 {
            parts.push("const");
        }
        if self.type_qualifier & ffi::CL_KERNEL_ARG_TYPE_VOLATILE != 0 {
            parts.push("volatile");
        }
        parts.push(&self.type_name);
        parts.push(&self.name);
        parts.join(" ")
    }
}

/// A kernel function signature.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct KernelDecl {
    pub name: String,
    pub args: Vec<ArgDecl>,
}

impl KernelDecl {
    pub fn to_source(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.to_source()).collect();
        format!("__kernel void {}({})", self.name, args.join(", "))
    }
}


fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn take_ident(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

/// Removes `//` and `/* */` comments.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = match after.find('\n') {
                Some(nl) => &after[nl..],
                None => "",
            };
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(end) => &after[end + 2..],
                None => "",
            };
            out.push(' ');
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}

fn parse_arg(arg: &str) -> Option<ArgDecl> {
    let spaced = arg.replace('*', " * ");
    let mut address = ffi::CL_KERNEL_ARG_ADDRESS_PRIVATE;
    let mut access = ffi::CL_KERNEL_ARG_ACCESS_NONE;
    let mut type_qualifier: cl_bitfield = 0;
    let mut pointers = 0;
    let mut type_tokens: Vec<&str> = Vec::new();

    for token in spaced.split_whitespace() {
        match token {
            "__global" | "global" => address = ffi::CL_KERNEL_ARG_ADDRESS_GLOBAL,
            "__local" | "local" => address = ffi::CL_KERNEL_ARG_ADDRESS_LOCAL,
            "__constant" | "constant" => address = ffi::CL_KERNEL_ARG_ADDRESS_CONSTANT,
            "__private" | "private" => address = ffi::CL_KERNEL_ARG_ADDRESS_PRIVATE,
            "__read_only" | "read_only" => access = ffi::CL_KERNEL_ARG_ACCESS_READ_ONLY,
            "__write_only" | "write_only" => access = ffi::CL_KERNEL_ARG_ACCESS_WRITE_ONLY,
            "__read_write" | "read_write" => access = ffi::CL_KERNEL_ARG_ACCESS_READ_WRITE,
            "const" => type_qualifier |= ffi::CL_KERNEL_ARG_TYPE_CONST,
            "volatile" => type_qualifier |= ffi::CL_KERNEL_ARG_TYPE_VOLATILE,
            "restrict" | "__restrict" => type_qualifier |= ffi::CL_KERNEL_ARG_TYPE_RESTRICT,
            "*" => pointers += 1,
            other => type_tokens.push(other),
        }
    }

    let name = type_tokens.pop()?.to_owned();
    if type_tokens.is_empty() {
        return None;
    }

    let mut type_name = type_tokens.join(" ");
    for _ in 0..pointers {
        type_name.push('*');
    }

    if type_name.starts_with("image") {
        address = ffi::CL_KERNEL_ARG_ADDRESS_GLOBAL;
        if access == ffi::CL_KERNEL_ARG_ACCESS_NONE {
            access = ffi::CL_KERNEL_ARG_ACCESS_READ_ONLY;
        }
    }

    Some(ArgDecl { name, type_name, address, access, type_qualifier })
}

fn parse_args(args: &str) -> Option<Vec<ArgDecl>> {
    let args = args.trim();
    if args.is_empty() || args == "void" {
        return Some(Vec::new());
    }
    args.split(',').map(parse_arg).collect()
}

/// Returns the signature of every `__kernel` function in `src`.
pub(super) fn parse_kernels(src: &str) -> Vec<KernelDecl> {
    let src = strip_comments(src);
    let mut kernels = Vec::new();
    let mut from = 0;

    while let Some(pos) = src[from..].find("kernel") {
        let start = from + pos;
        from = start + "kernel".len();

        let before = src[..start].trim_end_matches('_');
        if before.chars().next_back().map_or(false, is_ident_char) {
            continue;
        }
        let rest = &src[from..];
        if rest.chars().next().map_or(false, is_ident_char) {
            continue;
        }

        let rest = match rest.trim_start().strip_prefix("void") {
            Some(r) if !r.starts_with(is_ident_char) => r.trim_start(),
            _ => continue,
        };
        let (name, rest) = take_ident(rest);
        if name.is_empty() {
            continue;
        }
        let rest = match rest.trim_start().strip_prefix('(') {
            Some(r) => r,
            None => continue,
        };
        let close = match rest.find(')') {
            Some(close) => close,
            None => continue,
        };

        if let Some(args) = parse_args(&rest[..close]) {
            kernels.push(KernelDecl { name: name.to_owned(), args });
        }
    }
    kernels
}

/// Returns the one-based line number and header name of each quoted
/// `#include` directive.
pub(super) fn includes(src: &str) -> Vec<(usize, String)> {
    src.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let rest = line.trim_start().strip_prefix("#include")?.trim();
            let inner = rest.strip_prefix('"')?;
            let end = inner.find('"')?;
            Some((idx + 1, inner[..end].to_owned()))
        })
        .collect()
}

/// Returns the one-based line number and message of each `#error`
/// directive.
pub(super) fn errors(src: &str) -> Vec<(usize, String)> {
    src.lines()
        .enumerate()
        .filter_map(|(idx, line)| line.trim_start().strip_prefix("#error")
            .map(|msg| (idx + 1, msg.trim().to_owned())))
        .collect()
}

/// Returns the size in bytes of a scalar or vector argument type.
pub(super) fn type_size(type_name: &str) -> Option<usize> {
    let owned;
    let mut name = type_name.trim();
    if let Some(rest) = name.strip_prefix("unsigned ") {
        owned = format!("u{}", rest.trim());
        name = &owned;
    }

    let digits = name.find(|c: char| c.is_ascii_digit()).unwrap_or(name.len());
    let (base, width) = name.split_at(digits);

    let base_size = match base {
        "bool" | "char" | "uchar" => 1,
        "short" | "ushort" | "half" => 2,
        "int" | "uint" | "float" => 4,
        "long" | "ulong" | "double" | "size_t" | "ptrdiff_t" | "intptr_t" | "uintptr_t" => 8,
        _ => return None,
    };

    let count = match width {
        "" => 1,
        "2" => 2,
        "3" | "4" => 4,
        "8" => 8,
        "16" => 16,
        _ => return None,
    };

    Some(base_size * count)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kernel_signatures() {
        let src = r#"
            // __kernel void commented_out(int a)
            __kernel void add(__global const float* a, __global float* b, uint n) {
                b[get_global_id(0)] += a[get_global_id(0)];
            }
            kernel void blur(read_only image2d_t src, __local float4 *tmp, sampler_t s) {}
            void helper(int x) {}
        "#;

        let kernels = parse_kernels(src);
        assert_eq!(kernels.len(), 2);

        assert_eq!(kernels[0].name, "add");
        assert_eq!(kernels[0].args.len(), 3);
        assert_eq!(kernels[0].args[0].type_name, "float*");
        assert_eq!(kernels[0].args[0].address, ffi::CL_KERNEL_ARG_ADDRESS_GLOBAL);
        assert_eq!(kernels[0].args[0].type_qualifier, ffi::CL_KERNEL_ARG_TYPE_CONST);
        assert_eq!(kernels[0].args[2].name, "n");
        assert_eq!(kernels[0].args[2].address, ffi::CL_KERNEL_ARG_ADDRESS_PRIVATE);

        assert_eq!(kernels[1].name, "blur");
        assert!(kernels[1].args[0].is_image());
        assert_eq!(kernels[1].args[0].access, ffi::CL_KERNEL_ARG_ACCESS_READ_ONLY);
        assert!(kernels[1].args[1].is_local());
        assert!(kernels[1].args[2].is_sampler());
    }

    #[test]
    fn signature_source_reparses() {
        let src = "__kernel void k(__global const float* a, __local int* l, uint2 v) {}";
        let kernels = parse_kernels(src);
        let reparsed = parse_kernels(&kernels[0].to_source());
        assert_eq!(kernels, reparsed);
    }

    #[test]
    fn directives() {
        let src = "#include \"common.h\"\n#include <stdio.h>\nint x;\n  #error nope\n";
        assert_eq!(includes(src), vec![(1, "common.h".to_owned())]);
        assert_eq!(errors(src), vec![(4, "nope".to_owned())]);
    }

    #[test]
    fn scalar_sizes() {
        assert_eq!(type_size("uint"), Some(4));
        assert_eq!(type_size("unsigned int"), Some(4));
        assert_eq!(type_size("float3"), Some(16));
        assert_eq!(type_size("double16"), Some(128));
        assert_eq!(type_size("my_struct"), None);
    }
}
