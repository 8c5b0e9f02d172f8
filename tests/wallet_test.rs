mod common;

use anyhow::Result;
use bursar::application::AppError;
use bursar::domain::{TransactionKind, TransactionStatus};
use common::{fund_session_account, test_service, Students};

#[tokio::test]
async fn test_topup_credits_balance_and_logs_payment() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_ada(&service).await?;

    let transaction = service.top_up(100_000, "card").await?;

    assert_eq!(transaction.kind, TransactionKind::Payment);
    assert_eq!(transaction.status, TransactionStatus::Completed);
    assert_eq!(transaction.amount_cents, 100_000);
    assert_eq!(transaction.description, "Top up via card");

    let me = service.current_account().await?;
    assert_eq!(me.balance_cents, 100_000);

    let log = service.list_transactions(None).await?;
    assert_eq!(log.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_topup_below_minimum_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_ada(&service).await?;

    // 400 is under the 500 floor
    let result = service.top_up(40_000, "card").await;
    assert!(matches!(result, Err(AppError::BelowMinimum { .. })));

    let me = service.current_account().await?;
    assert_eq!(me.balance_cents, 0);
    assert!(service.list_transactions(None).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_operations_require_session() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.top_up(100_000, "card").await,
        Err(AppError::NotAuthenticated)
    ));
    assert!(matches!(
        service.transfer("20CSC099", 30_000, None).await,
        Err(AppError::NotAuthenticated)
    ));
    assert!(matches!(
        service.pay("Campus Cafe", 10_000).await,
        Err(AppError::NotAuthenticated)
    ));
    assert!(matches!(
        service.list_transactions(None).await,
        Err(AppError::NotAuthenticated)
    ));

    Ok(())
}

#[tokio::test]
async fn test_transfer_moves_money_exactly() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_both(&service).await?;
    fund_session_account(&service, 100_000).await?;

    let outcome = service
        .transfer(Students::GRACE, 30_000, Some("lunch".into()))
        .await?;

    assert_eq!(outcome.transaction.kind, TransactionKind::Transfer);
    assert_eq!(outcome.transaction.sender.as_deref(), Some(Students::ADA));
    assert_eq!(outcome.transaction.recipient.as_deref(), Some(Students::GRACE));
    assert_eq!(outcome.transaction.description, "lunch");
    assert_eq!(outcome.sender_balance_cents, 70_000);

    let sender = service.get_profile(Students::ADA).await?;
    let recipient = service.get_profile(Students::GRACE).await?;
    assert_eq!(sender.balance_cents, 70_000);
    assert_eq!(recipient.balance_cents, 30_000);

    // Total balance across all accounts is conserved
    assert_eq!(sender.balance_cents + recipient.balance_cents, 100_000);

    Ok(())
}

#[tokio::test]
async fn test_transfer_insufficient_funds_changes_nothing() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_both(&service).await?;
    fund_session_account(&service, 50_000).await?;

    let log_before = service.list_transactions(None).await?.len();

    // 600 when the balance is 500
    let result = service.transfer(Students::GRACE, 60_000, None).await;
    assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));

    let sender = service.get_profile(Students::ADA).await?;
    let recipient = service.get_profile(Students::GRACE).await?;
    assert_eq!(sender.balance_cents, 50_000);
    assert_eq!(recipient.balance_cents, 0);
    assert_eq!(service.list_transactions(None).await?.len(), log_before);

    Ok(())
}

#[tokio::test]
async fn test_transfer_to_unknown_recipient_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_ada(&service).await?;
    fund_session_account(&service, 100_000).await?;

    let result = service.transfer("99XYZ000", 30_000, None).await;
    assert!(matches!(result, Err(AppError::RecipientNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_transfer_below_minimum_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_both(&service).await?;
    fund_session_account(&service, 100_000).await?;

    // 50 is under the 100 floor
    let result = service.transfer(Students::GRACE, 5_000, None).await;
    assert!(matches!(result, Err(AppError::BelowMinimum { .. })));

    let sender = service.get_profile(Students::ADA).await?;
    assert_eq!(sender.balance_cents, 100_000);

    Ok(())
}

#[tokio::test]
async fn test_transfer_default_description() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_both(&service).await?;
    fund_session_account(&service, 100_000).await?;

    let outcome = service.transfer(Students::GRACE, 30_000, None).await?;
    assert_eq!(
        outcome.transaction.description,
        format!("Send to {}", Students::GRACE)
    );

    Ok(())
}

#[tokio::test]
async fn test_pay_debits_balance_and_logs_vendor() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_ada(&service).await?;
    fund_session_account(&service, 100_000).await?;

    let outcome = service.pay("Campus Cafe", 25_000).await?;

    assert_eq!(outcome.transaction.kind, TransactionKind::Payment);
    assert_eq!(outcome.transaction.description, "QR payment to Campus Cafe");
    assert_eq!(outcome.balance_cents, 75_000);
    assert_eq!(outcome.points_earned, 2);

    let me = service.current_account().await?;
    assert_eq!(me.balance_cents, 75_000);
    assert_eq!(me.loyalty_points, 2);

    Ok(())
}

#[tokio::test]
async fn test_pay_insufficient_funds_changes_nothing() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Students::register_ada(&service).await?;
    fund_session_account(&service, 50_000).await?;

    let result = service.pay("Campus Cafe", 60_000).await;
    assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));

    let me = service.current_account().await?;
    assert_eq!(me.balance_cents, 50_000);
    assert_eq!(me.loyalty_points, 0);
    assert_eq!(service.list_transactions(None).await?.len(), 1);

    Ok(())
}
