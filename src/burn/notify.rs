//! Completion email via the system `mail` command.

use anyhow::Result;

use crate::preflight::{check_required_tools, MAIL_TOOL};
use crate::process::Cmd;

/// `mail -s <message> <addr>...`, with the message as the body too.
pub fn mail_command(addresses: &[String], message: &str) -> Cmd {
    Cmd::new("mail")
        .args(["-s", message])
        .args(addresses)
        .stdin(format!("{}\n", message))
        .error_msg("mail failed")
}

/// Send `message` to every address. No-op for an empty list.
pub fn send_mail(addresses: &[String], message: &str) -> Result<()> {
    if addresses.is_empty() {
        return Ok(());
    }
    check_required_tools(&[MAIL_TOOL])?;
    log::info!("mailing status to {}", addresses.join(","));
    mail_command(addresses, message).run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_command_args() {
        let addresses = vec!["ops@example.org".to_string(), "me@example.org".to_string()];
        let cmd = mail_command(&addresses, "CD burn finished OK");
        let args: Vec<_> = cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["-s", "CD burn finished OK", "ops@example.org", "me@example.org"]
        );
    }

    #[test]
    fn test_empty_list_sends_nothing() {
        assert!(send_mail(&[], "anything").is_ok());
    }
}
