// ABOUTME: Profile command: show body metrics or save new ones
// ABOUTME: BMI is derived from height and weight on save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cook_ai::context::AppContext;
use cook_ai::errors::AppResult;

use crate::helpers::display::print_profile;

/// Show the profile, or update it when `details` is `((height, weight), calories)`
pub async fn run(ctx: &AppContext, details: Option<((u32, u32), u32)>) -> AppResult<()> {
    let user = ctx.session.current_user();
    let profile = match details {
        Some(((height, weight), calories)) => {
            let profile = ctx
                .profile()
                .update_details(user, height, weight, calories)
                .await?;
            println!("User details updated!");
            profile
        }
        None => ctx.profile().profile(user).await?,
    };
    print_profile(&profile);
    Ok(())
}
