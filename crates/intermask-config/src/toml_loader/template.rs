//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Intermask Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "Intermask"
# width = 800            # 1-16384
# height = 600           # 1-16384
# url = "https://example.com"
# background = "#ffffff" # #rrggbb, #rrggbbaa or rgba(r,g,b,a)
# user_agent = "Intermask/0.1"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
