//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: wallet owners; the balance column is the wallet store
//! - `operators`: mobile/DTH reference data for recharges
//! - `transactions`: the status state machine's rows
//! - `ledger_effects`: the idempotency guard's durable record, one row per
//!   committed wallet movement, unique per `(transaction_id, direction)`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    WalletBalance,
}

#[derive(Iden)]
enum Operators {
    Table,
    Id,
    Code,
    Kind,
    CommissionBps,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    GatewayRef,
    UserId,
    Kind,
    Status,
    AmountMinor,
    OperatorId,
    RecipientId,
    Description,
    IpAddress,
    DeviceInfo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LedgerEffects {
    Table,
    Seq,
    TransactionId,
    Direction,
    UserId,
    AmountMinor,
    AppliedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::WalletBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Operators
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Operators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operators::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operators::Code).string().not_null())
                    .col(ColumnDef::new(Operators::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Operators::CommissionBps)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operators-code-unique")
                    .table(Operators::Table)
                    .col(Operators::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::GatewayRef).string())
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::OperatorId).string())
                    .col(ColumnDef::new(Transactions::RecipientId).string())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::IpAddress).string())
                    .col(ColumnDef::new(Transactions::DeviceInfo).string())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-operator_id")
                            .from(Transactions::Table, Transactions::OperatorId)
                            .to(Operators::Table, Operators::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-recipient_id")
                            .from(Transactions::Table, Transactions::RecipientId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-gateway_ref-unique")
                    .table(Transactions::Table)
                    .col(Transactions::GatewayRef)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Ledger effects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEffects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEffects::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEffects::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEffects::Direction).string().not_null())
                    .col(ColumnDef::new(LedgerEffects::UserId).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEffects::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEffects::AppliedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_effects-transaction_id")
                            .from(LedgerEffects::Table, LedgerEffects::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-ledger_effects-transaction_id-direction")
                    .table(LedgerEffects::Table)
                    .col(LedgerEffects::TransactionId)
                    .col(LedgerEffects::Direction)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_effects-user_id")
                    .table(LedgerEffects::Table)
                    .col(LedgerEffects::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(LedgerEffects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Operators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
