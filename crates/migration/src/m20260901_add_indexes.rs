use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Membership tables hold each user at most once
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("unique_lab_executive")
                    .table(LabExecutives::Table)
                    .col(LabExecutives::LabId)
                    .col(LabExecutives::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("unique_course_coordinator")
                    .table(CourseCoordinators::Table)
                    .col(CourseCoordinators::CourseId)
                    .col(CourseCoordinators::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("unique_group_student")
                    .table(GroupStudents::Table)
                    .col(GroupStudents::GroupId)
                    .col(GroupStudents::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("unique_group_teaching_assistant")
                    .table(GroupTeachingAssistants::Table)
                    .col(GroupTeachingAssistants::GroupId)
                    .col(GroupTeachingAssistants::UserId)
                    .to_owned(),
            )
            .await?;

        // A course cannot have two groups with the same name
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("unique_group_of_course")
                    .table(Groups::Table)
                    .col(Groups::CourseId)
                    .col(Groups::GroupName)
                    .to_owned(),
            )
            .await?;

        // Each person has at most one record per session
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("one_record_per_user_per_session")
                    .table(CheckInRecords::Table)
                    .col(CheckInRecords::SessionId)
                    .col(CheckInRecords::UserId)
                    .to_owned(),
            )
            .await?;

        // Lookups for the sessions of a lab on a given day
        manager
            .create_index(
                Index::create()
                    .name("idx_groups_lab_id_day_of_week")
                    .table(Groups::Table)
                    .col(Groups::LabId)
                    .col(Groups::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_lab_id_lab_date")
                    .table(Sessions::Table)
                    .col(Sessions::LabId)
                    .col(Sessions::LabDate)
                    .to_owned(),
            )
            .await?;

        // Indexes on foreign keys for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_group_id")
                    .table(Sessions::Table)
                    .col(Sessions::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_week_id")
                    .table(Sessions::Table)
                    .col(Sessions::WeekId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_in_records_user_id")
                    .table(CheckInRecords::Table)
                    .col(CheckInRecords::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_make_up_sessions_original_session_id")
                    .table(MakeUpSessions::Table)
                    .col(MakeUpSessions::OriginalSessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_make_up_sessions_make_up_session_id")
                    .table(MakeUpSessions::Table)
                    .col(MakeUpSessions::MakeUpSessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_make_up_sessions_make_up_session_id").table(MakeUpSessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_make_up_sessions_original_session_id").table(MakeUpSessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_check_in_records_user_id").table(CheckInRecords::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sessions_week_id").table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sessions_group_id").table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sessions_lab_id_lab_date").table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_groups_lab_id_day_of_week").table(Groups::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("one_record_per_user_per_session").table(CheckInRecords::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("unique_group_of_course").table(Groups::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("unique_group_teaching_assistant").table(GroupTeachingAssistants::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("unique_group_student").table(GroupStudents::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("unique_course_coordinator").table(CourseCoordinators::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("unique_lab_executive").table(LabExecutives::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum LabExecutives {
    Table,
    LabId,
    UserId,
}

#[derive(Iden)]
enum CourseCoordinators {
    Table,
    CourseId,
    UserId,
}

#[derive(Iden)]
enum Groups {
    Table,
    CourseId,
    DayOfWeek,
    GroupName,
    LabId,
}

#[derive(Iden)]
enum GroupStudents {
    Table,
    GroupId,
    UserId,
}

#[derive(Iden)]
enum GroupTeachingAssistants {
    Table,
    GroupId,
    UserId,
}

#[derive(Iden)]
enum Sessions {
    Table,
    GroupId,
    LabDate,
    LabId,
    WeekId,
}

#[derive(Iden)]
enum MakeUpSessions {
    Table,
    MakeUpSessionId,
    OriginalSessionId,
}

#[derive(Iden)]
enum CheckInRecords {
    Table,
    SessionId,
    UserId,
}
