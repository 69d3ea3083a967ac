use super::usage;
use crate::commands::{CommandContext, CommandInvocation, CommandResult};
use crate::ui::page::Notice;

const USAGE_PERSONA: &str = "/persona <name>";
const USAGE_MODEL: &str = "/model <name>";

pub(crate) fn handle_persona(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return usage(USAGE_PERSONA);
    }

    let notice = match context.controller.select_persona(invocation.args) {
        Ok(true) => Notice::info(format!(
            "Persona set: {}",
            context.controller.session().active_persona().name
        )),
        Ok(false) => Notice::info(format!(
            "Persona already active: {}",
            context.controller.session().active_persona().name
        )),
        Err(err) => Notice::error(err.to_string()),
    };
    CommandResult::Notice(notice)
}

pub(crate) fn handle_model(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if !invocation.has_args() {
        return usage(USAGE_MODEL);
    }

    let notice = match context.controller.select_model(invocation.args) {
        Ok(true) => Notice::info(format!(
            "Model set: {}",
            context.controller.session().active_model().display_name
        )),
        Ok(false) => Notice::info(format!(
            "Model already active: {}",
            context.controller.session().active_model().display_name
        )),
        Err(err) => Notice::error(err.to_string()),
    };
    CommandResult::Notice(notice)
}
