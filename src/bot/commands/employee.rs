use teloxide::prelude::*;

use crate::bot::commands::position;
use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::database::models::{Employee, EmployeeListing};
use crate::error::BotError;
use crate::utils::{
    datetime::format_birth_date,
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_database_error},
    validation::parse_employee_line,
};

/// `/addemployee` with no arguments opens the guided form; with arguments it
/// takes the single-line `First; Last; YYYY-MM-DD; Position[; photo]` form.
pub async fn handle_add_employee(
    bot: &Bot,
    caller: &Caller,
    args: &str,
    ctx: &BotContext,
) -> HandlerResult {
    if args.trim().is_empty() {
        return start_intake(bot, caller, ctx).await;
    }

    let feedback = CommandFeedback::new(bot.clone(), caller.chat_id);
    log_command_start("addemployee", &caller.username, caller.id.0, Some(args));

    let new_employee = match parse_employee_line(args) {
        Ok(new_employee) => new_employee,
        Err(e) => {
            feedback
                .validation_error(
                    &e.to_string(),
                    "Use /addemployee First; Last; YYYY-MM-DD; Position; photo link, or send /addemployee alone for step-by-step input",
                )
                .await?;
            return Ok(());
        }
    };

    match Employee::insert(&ctx.db.pool, &new_employee).await {
        Ok(employee) => {
            log_command_success(
                "addemployee",
                &caller.username,
                caller.id.0,
                Some(&format!("employee {}", employee.id)),
            );
            feedback
                .success(&format!(
                    "Employee {} {} was added.",
                    employee.first_name, employee.last_name
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("addemployee", &caller.username, caller.id.0, &e.to_string());
            feedback.report(&e).await?;
            if matches!(e, BotError::UnknownPosition(_)) {
                position::suggest_known_positions(&feedback, ctx).await?;
            }
        }
    }

    Ok(())
}

pub async fn start_intake(bot: &Bot, caller: &Caller, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), caller.chat_id);
    log_command_start("addemployee", &caller.username, caller.id.0, Some("guided form"));

    match ctx.workflow.start(caller.id).await {
        Ok(prompt) => {
            feedback.prompt(prompt).await?;
        }
        Err(e) => {
            log_command_error("addemployee", &caller.username, caller.id.0, &e.to_string());
            feedback.report(&e).await?;
        }
    }

    Ok(())
}

pub async fn handle_list_employees(bot: &Bot, caller: &Caller, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), caller.chat_id);

    match Employee::list(&ctx.db.pool).await {
        Ok(employees) => {
            feedback.info(&format_employee_list(&employees)).await?;
        }
        Err(e) => {
            log_database_error("select", "employees", &e.to_string());
            feedback.report(&BotError::Storage(e)).await?;
        }
    }

    Ok(())
}

pub async fn handle_cancel(bot: &Bot, caller: &Caller, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), caller.chat_id);

    match ctx.workflow.cancel(caller.id).await {
        Ok(true) => {
            log_command_success("cancel", &caller.username, caller.id.0, None);
            feedback.info("The employee form was discarded.").await?;
        }
        Ok(false) => {
            feedback.info("There is nothing to cancel.").await?;
        }
        Err(e) => {
            log_command_error("cancel", &caller.username, caller.id.0, &e.to_string());
            feedback.report(&e).await?;
        }
    }

    Ok(())
}

pub fn format_employee_list(employees: &[EmployeeListing]) -> String {
    if employees.is_empty() {
        return "No employees registered yet. Use /addemployee to add one.".to_string();
    }

    let mut text = format!("Employees ({}):\n", employees.len());
    for (i, employee) in employees.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {} {} - {}, born {}",
            i + 1,
            employee.first_name,
            employee.last_name,
            employee.position_name,
            format_birth_date(&employee.birth_date)
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_empty_list() {
        assert!(format_employee_list(&[]).contains("No employees"));
    }

    #[test]
    fn test_format_employee_list() {
        let employees = vec![
            EmployeeListing {
                first_name: "Anna".to_string(),
                last_name: "Lee".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 7, 4).unwrap(),
                position_name: "Engineer".to_string(),
            },
            EmployeeListing {
                first_name: "Omar".to_string(),
                last_name: "Sultanov".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1985, 1, 15).unwrap(),
                position_name: "Accountant".to_string(),
            },
        ];

        let text = format_employee_list(&employees);
        assert!(text.starts_with("Employees (2):"));
        assert!(text.contains("1. Anna Lee - Engineer, born 04 July 1990"));
        assert!(text.contains("2. Omar Sultanov - Accountant, born 15 January 1985"));
    }
}
