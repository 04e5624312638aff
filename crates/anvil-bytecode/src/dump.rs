//! Human-readable artifact dump for debugging and snapshot tests.

use std::fmt::Write as _;

use crate::class::ClassBuilder;
use crate::method::{MethodArtifact, ParameterRole};

/// Render every artifact of a class as stable, diffable text.
pub fn dump(class: &ClassBuilder) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "class {}", class.name());
    for method in class.methods() {
        dump_method(&mut out, method);
    }
    out
}

fn dump_method(out: &mut String, method: &MethodArtifact) {
    let _ = writeln!(out, "  method {} {}", method.signature, method.flags);

    if let Some(meta) = &method.metadata {
        let _ = write!(
            out,
            "    meta regular nullable_return={} tparams=[{}]",
            meta.nullable_return,
            meta.type_parameters.join(", ")
        );
        if let Some(signature) = &meta.return_signature {
            let _ = write!(out, " return_sig={signature}");
        }
        out.push('\n');
    }

    for (index, parameter) in method.parameter_metadata.iter().enumerate() {
        let role = match parameter.role {
            ParameterRole::ExtensionReceiver => "receiver",
            ParameterRole::TypeToken => "token",
            ParameterRole::Value => "value",
        };
        let _ = write!(
            out,
            "    param {index} {role} {} nullable={} default={}",
            parameter.name, parameter.nullable, parameter.has_default
        );
        if let Some(signature) = &parameter.type_signature {
            let _ = write!(out, " sig={signature}");
        }
        out.push('\n');
    }

    for local in &method.local_variables {
        let _ = writeln!(out, "    local {} {} {}", local.slot, local.name, local.ty);
    }

    if let Some(code) = &method.code {
        let _ = writeln!(
            out,
            "    code max_stack={} max_locals={}",
            code.limits.max_stack, code.limits.max_locals
        );
        for instruction in &code.instructions {
            let _ = writeln!(out, "      {instruction}");
        }
    }
}
