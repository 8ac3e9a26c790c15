pub mod admin;
pub mod employee;
pub mod position;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Birthday Reminder Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Open the admin panel")]
    Admin,
    #[command(description = "Add a position: /addposition <name>")]
    AddPosition(String),
    #[command(
        description = "Add an employee step by step, or in one line: /addemployee First; Last; YYYY-MM-DD; Position; photo"
    )]
    AddEmployee(String),
    #[command(description = "List all employees")]
    Employees,
    #[command(description = "Abandon the employee form in progress")]
    Cancel,
}
