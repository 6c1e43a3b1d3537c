//! [`Command`] definition.

pub mod cascade_property_status;
pub mod clear_notifications;
pub mod create_property;
pub mod create_sale;
pub mod delete_property;
pub mod delete_sale;
pub mod evaluate_achievements;
pub mod mark_notification_as_read;
pub mod outcome;
pub mod refresh_notifications;
pub mod save_achievement;
pub mod save_goal;
pub mod toggle_collection_status;
pub mod update_property;
pub mod update_sale;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cascade_property_status::CascadePropertyStatus,
    clear_notifications::ClearNotifications,
    create_property::CreateProperty,
    create_sale::CreateSale,
    delete_property::DeleteProperty,
    delete_sale::DeleteSale,
    evaluate_achievements::EvaluateAchievements,
    mark_notification_as_read::MarkNotificationAsRead,
    outcome::{Cascade, Evaluation, Outcome},
    refresh_notifications::RefreshNotifications,
    save_achievement::SaveAchievement,
    save_goal::SaveGoal,
    toggle_collection_status::ToggleCollectionStatus,
    update_property::UpdateProperty,
    update_sale::UpdateSale,
};
