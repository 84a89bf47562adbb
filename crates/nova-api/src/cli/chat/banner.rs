//! Welcome banner for console sessions.

use console::style;

/// Print the banner shown before the greeting.
pub fn print_welcome_banner(model: &str, session_id: &str, voice: bool, camera: bool) {
    let on_off = |on: bool| {
        if on {
            style("on").green()
        } else {
            style("off").dim()
        }
    };

    println!();
    println!("  {}", style("NOVA").cyan().bold());
    println!("  {}", style("Voice-driven personal assistant").dim());
    println!();
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!("  {}    {}", style("Voice:").bold(), on_off(voice));
    println!("  {}   {}", style("Camera:").bold(), on_off(camera));
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
