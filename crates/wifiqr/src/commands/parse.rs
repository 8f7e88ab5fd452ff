//! `wifiqr parse`: decode a payload back into its fields.

use wifiqr_core::{CoreError, ParsedPayload};

use crate::cli::{GlobalOpts, ParseArgs};
use crate::error::CliError;
use crate::output;

fn detail(p: &ParsedPayload, color: bool) -> String {
    let row = |label: &str, value: &str| {
        format!("{} {value}", output::heading(&format!("{label:<12}"), color))
    };
    let mut lines = vec![
        row("SSID", &p.ssid),
        row(
            "Encryption",
            &format!("{} ({})", p.encryption.label(), p.encryption.token()),
        ),
    ];
    match p.password {
        Some(ref pw) => lines.push(row("Password", pw)),
        None => lines.push(row("Password", &output::dim("(none)", color))),
    }
    lines.push(row("Hidden", if p.hidden { "yes" } else { "no" }));
    lines.join("\n")
}

pub fn handle(args: &ParseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let parsed = wifiqr_core::parse(&args.payload).map_err(CoreError::from)?;
    tracing::debug!(ssid = %parsed.ssid, encryption = %parsed.encryption, "payload parsed");

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &parsed,
        |p| detail(p, color),
        |p| p.ssid.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
