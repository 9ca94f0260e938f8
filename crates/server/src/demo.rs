//! Handlers mounted by the standalone server so a fresh Slack app has
//! something to talk to.

use anyhow::{bail, Result};
use flack_core::errors::RegistrationError;
use flack_slack::{
    Action, ActionCall, ActionStyle, Attachment, CommandCall, Confirmation, Dispatcher, Reply,
    WebhookCall,
};

pub const ECHO_TRIGGER: &str = "!echo";
pub const STATUS_COMMAND: &str = "/flack";
pub const ACK_ACTION: &str = "acknowledge";

pub fn register(dispatcher: &mut Dispatcher) -> Result<(), RegistrationError> {
    dispatcher.register_trigger(ECHO_TRIGGER, Some("echo"), echo)?;
    dispatcher.register_command(STATUS_COMMAND, status)?;
    dispatcher.register_action(ACK_ACTION, acknowledge)?;
    Ok(())
}

fn echo(call: WebhookCall) -> Result<Reply> {
    if call.text.is_empty() {
        return Ok(Reply::None);
    }
    Ok(Reply::text(format!("{} said: {}", call.user.name, call.text)))
}

fn status(call: CommandCall) -> Result<Reply> {
    match call.text.trim() {
        "" | "help" => Ok(Reply::private(format!(
            "usage: {STATUS_COMMAND} [help|ping|card|later <text>]"
        ))),
        "ping" => Ok(Reply::text("pong")),
        "card" => Ok(Reply::Attachment(status_card(&call))),
        rest => match rest.strip_prefix("later") {
            Some(text) => Ok(Reply::indirect("on it", text.trim().to_owned())),
            None => bail!("unknown subcommand `{rest}`"),
        },
    }
}

fn status_card(call: &CommandCall) -> Attachment {
    Attachment::new()
        .fallback("flack status")
        .color("good")
        .title("flack is up")
        .field("Channel", format!("#{}", call.channel.name), true)
        .field("Requested by", call.user.name.clone(), true)
        .callback_id("flack-status")
        .action(Action::button(ACK_ACTION, "Acknowledge").style(ActionStyle::Primary).value("ok"))
        .action(
            Action::button(ACK_ACTION, "Dismiss")
                .style(ActionStyle::Danger)
                .value("dismiss")
                .confirm(Confirmation::new("Dismiss status?", "The card will stay in the channel.")),
        )
}

fn acknowledge(call: ActionCall) -> Result<Reply> {
    let verb = if call.value == "dismiss" { "dismissed" } else { "acknowledged" };
    Ok(Reply::indirect(false, format!("{} {verb} {}", call.user.name, call.callback_id)))
}
