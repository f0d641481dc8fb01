//! Declarative argument schema for every host-visible method.
//!
//! Each entry fixes a method's arity and the expected kind of every
//! position. [`MethodSpec::validate`] checks a whole argument set and
//! converts it into typed [`Arg`]s before the binding touches the native
//! engine, so a call is either applied in full or not at all.

use intermask_common::{ArgumentError, HostFunction, HostValue, ValueKind};

/// Methods exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Construct,
    SetTitle,
    SetSize,
    Navigate,
    Run,
    Destroy,
    Evaluate,
    GetTitle,
    OnEvent,
    OnResize,
    SetBackgroundColor,
    SetCustomUserAgent,
    GetAdditionalInfo,
    IsDocumentReady,
}

/// Expected kind of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    String,
    /// A host number that must convert losslessly enough to `i32`
    /// (finite, in range; the fractional part is truncated).
    Integer,
    Function,
}

impl Param {
    /// Host kind a value must have to satisfy this parameter.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Integer => ValueKind::Number,
            Self::Function => ValueKind::Function,
        }
    }
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    pub method: Method,
    /// Host-visible name.
    pub name: &'static str,
    pub params: &'static [Param],
}

pub const METHODS: &[MethodSpec] = &[
    MethodSpec {
        method: Method::Construct,
        name: "construct",
        params: &[],
    },
    MethodSpec {
        method: Method::SetTitle,
        name: "setTitle",
        params: &[Param::String],
    },
    MethodSpec {
        method: Method::SetSize,
        name: "setSize",
        params: &[Param::Integer, Param::Integer],
    },
    MethodSpec {
        method: Method::Navigate,
        name: "navigate",
        params: &[Param::String],
    },
    MethodSpec {
        method: Method::Run,
        name: "run",
        params: &[],
    },
    MethodSpec {
        method: Method::Destroy,
        name: "destroy",
        params: &[],
    },
    MethodSpec {
        method: Method::Evaluate,
        name: "evaluate",
        params: &[Param::String],
    },
    MethodSpec {
        method: Method::GetTitle,
        name: "getTitle",
        params: &[],
    },
    MethodSpec {
        method: Method::OnEvent,
        name: "onEvent",
        params: &[Param::Function],
    },
    MethodSpec {
        method: Method::OnResize,
        name: "onResize",
        params: &[Param::Function],
    },
    MethodSpec {
        method: Method::SetBackgroundColor,
        name: "setBackgroundColor",
        params: &[Param::String],
    },
    MethodSpec {
        method: Method::SetCustomUserAgent,
        name: "setCustomUserAgent",
        params: &[Param::String],
    },
    MethodSpec {
        method: Method::GetAdditionalInfo,
        name: "getAdditionalInfo",
        params: &[],
    },
    MethodSpec {
        method: Method::IsDocumentReady,
        name: "isDocumentReady",
        params: &[],
    },
];

/// Find a method by its host-visible name.
pub fn lookup(name: &str) -> Result<&'static MethodSpec, ArgumentError> {
    METHODS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| ArgumentError::UnknownMethod(name.to_string()))
}

/// The table entry for a method.
pub fn spec(method: Method) -> &'static MethodSpec {
    // Rows are in `Method` declaration order.
    &METHODS[method as usize]
}

/// A validated, typed argument.
#[derive(Debug, Clone)]
pub enum Arg<'a> {
    Str(&'a str),
    Int(i32),
    Func(&'a HostFunction),
}

impl MethodSpec {
    /// Check arity, then every argument's kind, converting as it goes.
    ///
    /// Nothing is returned until the whole set has passed.
    pub fn validate<'a>(&self, args: &'a [HostValue]) -> Result<Vec<Arg<'a>>, ArgumentError> {
        if args.len() != self.params.len() {
            return Err(ArgumentError::Arity {
                method: self.name,
                expected: self.params.len(),
                found: args.len(),
            });
        }

        self.params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, value))| self.convert(index, *param, value))
            .collect()
    }

    fn convert<'a>(
        &self,
        index: usize,
        param: Param,
        value: &'a HostValue,
    ) -> Result<Arg<'a>, ArgumentError> {
        match (param, value) {
            (Param::String, HostValue::String(s)) => Ok(Arg::Str(s)),
            (Param::Function, HostValue::Function(f)) => Ok(Arg::Func(f)),
            (Param::Integer, HostValue::Number(n)) => self.to_i32(index, *n).map(Arg::Int),
            _ => Err(ArgumentError::Kind {
                method: self.name,
                index,
                expected: param.kind(),
                found: value.kind(),
            }),
        }
    }

    fn to_i32(&self, index: usize, n: f64) -> Result<i32, ArgumentError> {
        if !n.is_finite() {
            return Err(self.invalid(index, format!("{n} is not a finite number")));
        }
        let truncated = n.trunc();
        if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
            return Err(self.invalid(index, format!("{n} does not fit in a 32-bit integer")));
        }
        Ok(truncated as i32)
    }

    /// Build an `Invalid` error for this method.
    pub fn invalid(&self, index: usize, reason: impl Into<String>) -> ArgumentError {
        ArgumentError::Invalid {
            method: self.name,
            index,
            reason: reason.into(),
        }
    }
}
