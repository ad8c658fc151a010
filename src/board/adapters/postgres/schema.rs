//! Diesel schema for board persistence.

diesel::table! {
    /// Task records placed on board columns.
    board_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Column holding the task.
        #[max_length = 255]
        column_id -> Varchar,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Position within the column.
        sort_order -> Int4,
        /// Assigned user, if any.
        #[max_length = 255]
        assignee_id -> Nullable<Varchar>,
        /// Creating user.
        #[max_length = 255]
        created_by -> Varchar,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Nullable<Text>,
        /// Task priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notifications delivered to users.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient.
        #[max_length = 255]
        user_id -> Varchar,
        /// Notification category.
        #[max_length = 50]
        kind -> Varchar,
        /// Short heading.
        title -> Text,
        /// Body.
        message -> Text,
        /// Related entity kind.
        #[max_length = 50]
        related_entity_type -> Varchar,
        /// Related entity identifier.
        related_entity_id -> Uuid,
        /// Whether the recipient read it.
        is_read -> Bool,
        /// Delivery timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Activity log entries.
    activity_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Acting user.
        #[max_length = 255]
        user_id -> Varchar,
        /// Changed entity kind.
        #[max_length = 50]
        entity_type -> Varchar,
        /// Changed entity identifier.
        entity_id -> Uuid,
        /// Recorded action.
        #[max_length = 50]
        action -> Varchar,
        /// Change payload.
        changes -> Jsonb,
        /// Recording timestamp.
        created_at -> Timestamptz,
    }
}
