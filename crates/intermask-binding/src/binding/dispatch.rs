use tracing::trace;

use intermask_common::{BindingError, Color, HostValue};

use crate::schema::{self, Arg, Method};

use super::Binding;

impl Binding {
    /// Invoke a host-visible method by name with untyped arguments.
    ///
    /// The whole argument set is validated against the method's schema
    /// before the window is touched. `construct` is accepted here too, so
    /// a host can drive the binding entirely by name.
    pub fn call(&self, name: &str, args: &[HostValue]) -> Result<HostValue, BindingError> {
        let spec = schema::lookup(name)?;
        let typed = spec.validate(args)?;
        trace!(method = spec.name, argc = args.len(), "dispatch");

        match (spec.method, typed.as_slice()) {
            (Method::Construct, []) => self.construct(args).map(|()| HostValue::Undefined),
            (Method::SetTitle, [Arg::Str(title)]) => {
                self.set_title(title).map(|()| HostValue::Undefined)
            }
            (Method::SetSize, [Arg::Int(width), Arg::Int(height)]) => self
                .set_size(*width, *height)
                .map(|()| HostValue::Undefined),
            (Method::Navigate, [Arg::Str(target)]) => {
                self.navigate(target).map(|()| HostValue::Undefined)
            }
            (Method::Run, []) => self.run().map(|()| HostValue::Undefined),
            (Method::Destroy, []) => self.destroy().map(|()| HostValue::Undefined),
            (Method::Evaluate, [Arg::Str(script)]) => {
                self.evaluate(script).map(|()| HostValue::Undefined)
            }
            (Method::GetTitle, []) => self.title().map(HostValue::String),
            (Method::OnEvent, [Arg::Func(callback)]) => self
                .on_event((*callback).clone())
                .map(|()| HostValue::Undefined),
            (Method::OnResize, [Arg::Func(callback)]) => self
                .on_resize((*callback).clone())
                .map(|()| HostValue::Undefined),
            (Method::SetBackgroundColor, [Arg::Str(color)]) => {
                let color = Color::parse(color).ok_or_else(|| {
                    spec.invalid(0, format!("'{color}' is not a colour (#rrggbb, #rrggbbaa or rgba())"))
                })?;
                self.set_background_color(color)
                    .map(|()| HostValue::Undefined)
            }
            (Method::SetCustomUserAgent, [Arg::Str(agent)]) => self
                .set_custom_user_agent(agent)
                .map(|()| HostValue::Undefined),
            (Method::GetAdditionalInfo, []) => {
                self.additional_info().map(|info| info.to_host_value())
            }
            (Method::IsDocumentReady, []) => self.is_document_ready().map(HostValue::Boolean),
            (method, typed) => Err(spec
                .invalid(0, format!("{method:?} cannot take {} validated argument(s)", typed.len()))
                .into()),
        }
    }
}
