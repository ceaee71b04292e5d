//! Prints the bcrypt hash to use as `ADMIN_PASSWORD_HASH`
//!
//! Usage: `hash-password <password>`, or pipe the password on stdin.

use cooking_assistant_api::auth::password::hash_password;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err("password must not be empty".into());
    }

    println!("{}", hash_password(&password)?);
    Ok(())
}
