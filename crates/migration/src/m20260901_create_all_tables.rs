use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::FirstName)
                            .string_len(150)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::LastName)
                            .string_len(150)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(254)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profiles table (one per user at most)
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::IsTa)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profiles-user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create weeks table
        manager
            .create_table(
                Table::create()
                    .table(Weeks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Weeks::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Weeks::MondayDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create labs table
        manager
            .create_table(
                Table::create()
                    .table(Labs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Labs::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Labs::LabName)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Labs::RoomCount).integer().not_null())
                    .col(
                        ColumnDef::new(Labs::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .check(Expr::col(Labs::RoomCount).gt(0))
                    .to_owned(),
            )
            .await?;

        // Create lab_executives junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(LabExecutives::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LabExecutives::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LabExecutives::LabId).uuid().not_null())
                    .col(ColumnDef::new(LabExecutives::UserId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lab_executives-lab_id")
                            .from(LabExecutives::Table, LabExecutives::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lab_executives-user_id")
                            .from(LabExecutives::Table, LabExecutives::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Courses::CourseCode)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Courses::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_coordinators junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(CourseCoordinators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseCoordinators::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseCoordinators::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseCoordinators::UserId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_coordinators-course_id")
                            .from(CourseCoordinators::Table, CourseCoordinators::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_coordinators-user_id")
                            .from(CourseCoordinators::Table, CourseCoordinators::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create groups table
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Groups::GroupName).string_len(16).not_null())
                    .col(ColumnDef::new(Groups::LabId).uuid().not_null())
                    .col(ColumnDef::new(Groups::LabRoom).integer().not_null())
                    .col(ColumnDef::new(Groups::DayOfWeek).integer().not_null())
                    .col(ColumnDef::new(Groups::StartTime).time().not_null())
                    .col(ColumnDef::new(Groups::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Groups::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .check(Expr::col(Groups::StartTime).lt(Expr::col(Groups::EndTime)))
                    .check(Expr::col(Groups::LabRoom).gt(0))
                    .check(Expr::col(Groups::DayOfWeek).between(1, 7))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-groups-course_id")
                            .from(Groups::Table, Groups::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-groups-lab_id")
                            .from(Groups::Table, Groups::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create group_students and group_teaching_assistants junction tables (many-to-many)
        for (table, prefix) in [
            (GroupMembers::GroupStudents, "group_students"),
            (
                GroupMembers::GroupTeachingAssistants,
                "group_teaching_assistants",
            ),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GroupMembers::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(GroupMembers::GroupId).uuid().not_null())
                        .col(ColumnDef::new(GroupMembers::UserId).uuid().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name(format!("fk-{prefix}-group_id"))
                                .from(table, GroupMembers::GroupId)
                                .to(Groups::Table, Groups::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(format!("fk-{prefix}-user_id"))
                                .from(table, GroupMembers::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
        }

        // Create sessions table; regular and special sessions share one id space
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::Kind).string_len(8).not_null())
                    .col(ColumnDef::new(Sessions::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::CheckInDdlMins).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::AllowLateCheckIn)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sessions::Compulsory)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sessions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    // Regular sessions only
                    .col(ColumnDef::new(Sessions::WeekId).uuid())
                    // Special sessions only
                    .col(ColumnDef::new(Sessions::LabId).uuid())
                    .col(ColumnDef::new(Sessions::LabRoom).integer())
                    .col(ColumnDef::new(Sessions::LabDate).date())
                    .col(ColumnDef::new(Sessions::StartTime).time())
                    .col(ColumnDef::new(Sessions::EndTime).time())
                    .check(Expr::col(Sessions::CheckInDdlMins).gt(0))
                    .check(
                        Expr::col(Sessions::Kind)
                            .eq("regular")
                            .and(Expr::col(Sessions::WeekId).is_not_null())
                            .or(Expr::col(Sessions::Kind)
                                .eq("special")
                                .and(Expr::col(Sessions::LabId).is_not_null())
                                .and(Expr::col(Sessions::LabRoom).gt(0))
                                .and(Expr::col(Sessions::LabDate).is_not_null())
                                .and(
                                    Expr::col(Sessions::StartTime)
                                        .lt(Expr::col(Sessions::EndTime)),
                                )),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-group_id")
                            .from(Sessions::Table, Sessions::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-week_id")
                            .from(Sessions::Table, Sessions::WeekId)
                            .to(Weeks::Table, Weeks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-lab_id")
                            .from(Sessions::Table, Sessions::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create make_up_sessions table
        manager
            .create_table(
                Table::create()
                    .table(MakeUpSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MakeUpSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MakeUpSessions::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(MakeUpSessions::OriginalSessionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MakeUpSessions::MakeUpSessionId)
                            .uuid()
                            .not_null(),
                    )
                    .check(
                        Expr::col(MakeUpSessions::OriginalSessionId)
                            .ne(Expr::col(MakeUpSessions::MakeUpSessionId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-make_up_sessions-student_id")
                            .from(MakeUpSessions::Table, MakeUpSessions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-make_up_sessions-original_session_id")
                            .from(MakeUpSessions::Table, MakeUpSessions::OriginalSessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-make_up_sessions-make_up_session_id")
                            .from(MakeUpSessions::Table, MakeUpSessions::MakeUpSessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create check_in_records table
        manager
            .create_table(
                Table::create()
                    .table(CheckInRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckInRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckInRecords::SessionId).uuid().not_null())
                    .col(ColumnDef::new(CheckInRecords::UserId).uuid().not_null())
                    .col(ColumnDef::new(CheckInRecords::UserType).integer().not_null())
                    .col(
                        ColumnDef::new(CheckInRecords::CheckInState)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CheckInRecords::CheckInTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CheckInRecords::LastModifyTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckInRecords::Remark)
                            .string_len(256)
                            .not_null()
                            .default(""),
                    )
                    .check(Expr::col(CheckInRecords::UserType).between(0, 1))
                    .check(Expr::col(CheckInRecords::CheckInState).between(0, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-check_in_records-session_id")
                            .from(CheckInRecords::Table, CheckInRecords::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-check_in_records-user_id")
                            .from(CheckInRecords::Table, CheckInRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(CheckInRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MakeUpSessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GroupMembers::GroupTeachingAssistants).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GroupMembers::GroupStudents).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseCoordinators::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LabExecutives::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Labs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Weeks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    IsStaff,
    IsSuperuser,
    Active,
    DateJoined,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    UserId,
    IsTa,
}

#[derive(Iden)]
enum Weeks {
    Table,
    Id,
    MondayDate,
}

#[derive(Iden)]
enum Labs {
    Table,
    Id,
    LabName,
    RoomCount,
    Active,
}

#[derive(Iden)]
enum LabExecutives {
    Table,
    Id,
    LabId,
    UserId,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    CourseCode,
    Title,
    Active,
}

#[derive(Iden)]
enum CourseCoordinators {
    Table,
    Id,
    CourseId,
    UserId,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    CourseId,
    GroupName,
    LabId,
    LabRoom,
    DayOfWeek,
    StartTime,
    EndTime,
    Active,
}

/// Columns shared by both group membership tables
#[derive(Iden, Clone, Copy)]
enum GroupMembers {
    GroupStudents,
    GroupTeachingAssistants,
    Id,
    GroupId,
    UserId,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    Kind,
    GroupId,
    CheckInDdlMins,
    AllowLateCheckIn,
    Compulsory,
    Active,
    WeekId,
    LabId,
    LabRoom,
    LabDate,
    StartTime,
    EndTime,
}

#[derive(Iden)]
enum MakeUpSessions {
    Table,
    Id,
    StudentId,
    OriginalSessionId,
    MakeUpSessionId,
}

#[derive(Iden)]
enum CheckInRecords {
    Table,
    Id,
    SessionId,
    UserId,
    UserType,
    CheckInState,
    CheckInTime,
    LastModifyTime,
    Remark,
}
