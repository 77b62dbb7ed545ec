//! Interactive menu
//!
//! One action per loop iteration. An action that fails prints its error and
//! waits for Enter; only Exit or Ctrl+C end the loop.

use std::fmt;

use anyhow::{Context, Result};
use inquire::validator::{Validation, ValueRequiredValidator};
use inquire::{Confirm, InquireError, Select, Text};
use socialctl_core::{PersonInput, SocialService};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Register,
    List,
    Delete,
    AddFriend,
    RemoveFriend,
    ListFriends,
    CityRecommendations,
    HobbyRecommendations,
    Statistics,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 10] = [
        MenuAction::Register,
        MenuAction::List,
        MenuAction::Delete,
        MenuAction::AddFriend,
        MenuAction::RemoveFriend,
        MenuAction::ListFriends,
        MenuAction::CityRecommendations,
        MenuAction::HobbyRecommendations,
        MenuAction::Statistics,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Register => "Register a person",
            MenuAction::List => "List people",
            MenuAction::Delete => "Delete a person",
            MenuAction::AddFriend => "Add a friend",
            MenuAction::RemoveFriend => "Remove a friend",
            MenuAction::ListFriends => "List friends",
            MenuAction::CityRecommendations => "Recommendations by city",
            MenuAction::HobbyRecommendations => "Recommendations by hobby",
            MenuAction::Statistics => "Statistics",
            MenuAction::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Parse the optional age field. Blank means "not given".
pub fn parse_age(input: &str) -> std::result::Result<Option<i32>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i32>() {
        Ok(age) if age >= 0 => Ok(Some(age)),
        Ok(_) => Err("Age cannot be negative".to_string()),
        Err(_) => Err(format!("'{}' is not a whole number", trimmed)),
    }
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationInterrupted)
    )
}

fn is_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled)
    )
}

/// Run the menu until the user exits.
pub async fn run(service: &SocialService) -> Result<()> {
    println!("\n👥 socialctl\n");

    loop {
        let action = match Select::new("What do you want to do?", MenuAction::ALL.to_vec())
            .with_page_size(MenuAction::ALL.len())
            .prompt()
        {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                MenuAction::Exit
            }
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        if action == MenuAction::Exit {
            println!("👋 Bye!");
            return Ok(());
        }

        debug!(?action, "menu action");
        match perform(service, action).await {
            Ok(()) => {}
            Err(e) if is_interrupt(&e) => {
                println!("👋 Bye!");
                return Ok(());
            }
            Err(e) if is_cancel(&e) => println!("⚠️  Cancelled"),
            Err(e) => {
                println!("❌ Error: {:#}", e);
                if !pause() {
                    return Ok(());
                }
            }
        }
        println!();
    }
}

/// Wait for Enter. Returns `false` if the user hit Ctrl+C instead.
fn pause() -> bool {
    !matches!(
        Text::new("Press Enter to continue...").prompt(),
        Err(InquireError::OperationInterrupted)
    )
}

fn ask_required(message: &str) -> Result<String> {
    Text::new(message)
        .with_validator(ValueRequiredValidator::new("This field is required"))
        .prompt()
        .with_context(|| format!("Failed to read '{}'", message.trim_end_matches(':')))
}

fn ask_optional(message: &str) -> Result<String> {
    Text::new(message)
        .with_help_message("Leave blank to skip")
        .prompt()
        .with_context(|| format!("Failed to read '{}'", message.trim_end_matches(':')))
}

async fn perform(service: &SocialService, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::Register => {
            let name = ask_required("Full name:")?;
            let city = ask_required("City:")?;
            let age = Text::new("Age (optional):")
                .with_validator(|input: &str| {
                    Ok(match parse_age(input) {
                        Ok(_) => Validation::Valid,
                        Err(msg) => Validation::Invalid(msg.into()),
                    })
                })
                .prompt()
                .context("Failed to read age")?;
            let hobby = ask_optional("Hobby (optional):")?;

            let input = PersonInput {
                id: None,
                name,
                city: Some(city),
                age: parse_age(&age).map_err(anyhow::Error::msg)?,
                hobby: Some(hobby),
            };
            let person = service.register_person(input).await?;
            println!("✅ Person saved:");
            print!("{}", render::format_person(0, &person));
        }

        MenuAction::List => {
            let filter = ask_optional("Filter by name, city or hobby:")?;
            let people = service.list_people(Some(filter.as_str())).await?;
            print!("{}", render::format_people("People", &people));
        }

        MenuAction::Delete => {
            let name = ask_required("Full name of the person to delete:")?;
            let confirmed = Confirm::new(
                "Delete this person and all of their friendships?",
            )
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;

            if confirmed {
                let person = service.delete_person_by_name(&name).await?;
                println!("✅ Deleted \"{}\"", person.name);
            } else {
                println!("⚠️  Cancelled");
            }
        }

        MenuAction::AddFriend => {
            let from = ask_required("Person adding a friend:")?;
            let to = ask_required("Friend to add:")?;
            let (a, b) = service.add_friend_by_name(&from, &to).await?;
            println!("✅ {} and {} are now friends", a.name, b.name);
        }

        MenuAction::RemoveFriend => {
            let from = ask_required("Person removing a friend:")?;
            let to = ask_required("Friend to remove:")?;
            if service.remove_friend_by_name(&from, &to).await? {
                println!("✅ Friendship removed");
            } else {
                println!("⚠️  They were not friends");
            }
        }

        MenuAction::ListFriends => {
            let name = ask_required("Whose friends?")?;
            let friends = service.list_friends_by_name(&name).await?;
            print!("{}", render::format_people("Friends", &friends));
        }

        MenuAction::CityRecommendations => {
            let name = ask_required("Recommendations for:")?;
            let people = service.city_recommendations(&name).await?;
            print!("{}", render::format_people("🏙️  Same city", &people));
        }

        MenuAction::HobbyRecommendations => {
            let name = ask_required("Recommendations for:")?;
            let people = service.hobby_recommendations(&name).await?;
            print!("{}", render::format_people("🎯 Same hobby", &people));
        }

        MenuAction::Statistics => {
            let stats = service.statistics().await?;
            print!("{}", render::format_statistics(&stats));
        }

        MenuAction::Exit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_parsing() {
        assert_eq!(parse_age(""), Ok(None));
        assert_eq!(parse_age("   "), Ok(None));
        assert_eq!(parse_age(" 42 "), Ok(Some(42)));
        assert_eq!(parse_age("0"), Ok(Some(0)));
        assert!(parse_age("-1").is_err());
        assert!(parse_age("forty").is_err());
    }

    #[test]
    fn menu_ends_with_exit() {
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Exit));
        assert_eq!(MenuAction::Statistics.to_string(), "Statistics");
        // The menu never supplies an id, so it can only register
        assert_eq!(MenuAction::Register.to_string(), "Register a person");
    }

    #[test]
    fn interrupts_are_recognised_through_context() {
        let err = Err::<(), _>(InquireError::OperationInterrupted)
            .context("Failed to read name")
            .unwrap_err();
        assert!(is_interrupt(&err));
        assert!(!is_cancel(&err));

        let err = anyhow::anyhow!("person 'x' not found");
        assert!(!is_interrupt(&err));
    }
}
