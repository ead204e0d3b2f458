//! Diesel schema for scheduling persistence.

diesel::table! {
    /// Shop tasks awaiting, undergoing or finished with work.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Short description of the work.
        #[max_length = 255]
        title -> Varchar,
        /// Specialization a worker must have.
        #[max_length = 50]
        required_specialization -> Varchar,
        /// Effort required in hours.
        duration_hours -> Float8,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Current assignee, set only while in progress.
        assigned_worker_id -> Nullable<Uuid>,
        /// Left unassigned by the latest scheduling run.
        in_queue -> Bool,
        /// Hidden from scheduling.
        archived -> Bool,
        /// Issue date used for aging.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scheduling-eligible workers.
    workers (id) {
        /// Worker identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        full_name -> Varchar,
        /// Specialization offered.
        #[max_length = 50]
        specialization -> Varchar,
        /// Capacity ceiling in hours.
        max_hours -> Float8,
        /// Cached sum of in-progress task hours.
        workload -> Float8,
        /// Takes part in scheduling.
        active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> workers (assigned_worker_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, workers);
