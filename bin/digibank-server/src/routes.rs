use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use digibank_domain::{
    AccountId, AccountNumber, AccountType, ClientId, TransactionKind, money::round_money,
};
use digibank_engine::{
    RECENT_TRANSACTIONS,
    request::{
        LoginRequest, OpenAccountRequest, PaymentRequest, RegisterClientRequest, RequestError,
        TransactionRequest,
    },
    response::{
        AccountStatsDissolved, DashboardStatsDissolved, DashboardSummaryDissolved,
        InterestResponseDissolved, OverdraftStatusDissolved, TransactionResponseDissolved,
    },
};
use itertools::Itertools;

use crate::{
    App, AppDissolved,
    auth::AuthenticatedClient,
    error::{AppError, AppJson},
    payload::{
        AccountPayload,
        request::{
            AccountNumberRequestPayload, AccountNumberRequestPayloadDissolved,
            ListTransactionsQuery, ListTransactionsQueryDissolved, LoginRequestPayload,
            LoginRequestPayloadDissolved, OpenAccountRequestPayload,
            OpenAccountRequestPayloadDissolved, PaymentRequestPayload,
            PaymentRequestPayloadDissolved, RegisterRequestPayload,
            RegisterRequestPayloadDissolved, TransactionRequestPayload,
            TransactionRequestPayloadDissolved,
        },
        response::{
            AccountResponsePayload, AccountStatsResponsePayload, AuthResponsePayload,
            ClientResponsePayload, DashboardStatsResponsePayload,
            DashboardSummaryResponsePayload, InterestResponsePayload, ListAccountsResponsePayload,
            ListTransactionsResponsePayload, OverdraftStatusResponsePayload, PAYMENT_CATEGORIES,
            PaymentCategoriesResponsePayload, TransactionResponsePayload,
        },
    },
};

type Created<T> = (StatusCode, Json<T>);

#[tracing::instrument]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// AUTH
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn register(
    State(app): State<App>,
    AppJson(payload): AppJson<RegisterRequestPayload>,
) -> Result<Created<AuthResponsePayload>, AppError> {
    let AppDissolved { engine, tokens } = app.dissolve();

    let RegisterRequestPayloadDissolved {
        first_name,
        last_name,
        national_id,
        email,
        password,
        address,
        phone,
    } = payload.dissolve();

    let request = RegisterClientRequest::builder()
        .first_name(first_name)
        .last_name(last_name)
        .national_id(national_id)
        .email(email)
        .password(password)
        .maybe_address(address)
        .maybe_phone(phone)
        .build()
        .map_err(RequestError::from)?;

    let client = engine.register_client(request).await?;
    let token = tokens.issue(&client)?;

    let response = AuthResponsePayload::builder()
        .message("client registered")
        .token(token)
        .user(client.into())
        .build();

    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip_all)]
pub async fn login(
    State(app): State<App>,
    AppJson(payload): AppJson<LoginRequestPayload>,
) -> Result<Json<AuthResponsePayload>, AppError> {
    let AppDissolved { engine, tokens } = app.dissolve();

    let LoginRequestPayloadDissolved { email, password } = payload.dissolve();

    let request =
        LoginRequest::builder().email(email).password(password).build().map_err(RequestError::from)?;

    let client = engine.authenticate(request).await?;
    let token = tokens.issue(&client)?;

    let response = AuthResponsePayload::builder()
        .message("login successful")
        .token(token)
        .user(client.into())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn me(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<ClientResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let client = engine.get_client(client_id).await?;

    Ok(Json(ClientResponsePayload::builder().message("client found").user(client.into()).build()))
}

// ACCOUNTS
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn list_accounts(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<ListAccountsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let accounts = engine.list_accounts(client_id).await?;

    let response = ListAccountsResponsePayload::builder()
        .message("accounts found")
        .total(accounts.len())
        .accounts(accounts.into_iter().map(AccountPayload::from).collect_vec())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn open_account(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<OpenAccountRequestPayload>,
) -> Result<Created<AccountResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let OpenAccountRequestPayloadDissolved {
        account_type,
        opening_balance,
        interest_rate,
        withdrawal_limit,
        overdraft_limit,
    } = payload.dissolve();

    let account_type = match account_type.as_deref().map(str::trim) {
        None => AccountType::Savings,
        Some(account_type) => account_type.parse().map_err(|_| {
            AppError::invalid_input("account type must be either savings or checking")
        })?,
    };

    let request = OpenAccountRequest::builder()
        .account_type(account_type)
        .maybe_opening_balance(opening_balance)
        .maybe_interest_rate(interest_rate)
        .maybe_withdrawal_limit(withdrawal_limit)
        .maybe_overdraft_limit(overdraft_limit)
        .build()
        .map_err(RequestError::from)?;

    let account = engine.open_account(client_id, request).await?;

    let response =
        AccountResponsePayload::builder().message("account opened").account(account.into()).build();

    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip_all)]
pub async fn account_stats(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<AccountStatsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let AccountStatsDissolved {
        total_balance,
        total_accounts,
        savings_accounts,
        checking_accounts,
        active_accounts,
    } = engine.account_stats(client_id).await?.dissolve();

    let response = AccountStatsResponsePayload::builder()
        .message("account statistics")
        .total_balance(round_money(total_balance))
        .total_accounts(total_accounts)
        .savings_accounts(savings_accounts)
        .checking_accounts(checking_accounts)
        .active_accounts(active_accounts)
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(%number))]
pub async fn get_account(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    Path(number): Path<String>,
) -> Result<Json<AccountResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let number = parse_account_number(&number)?;
    let account = engine.get_account(client_id, &number).await?;

    let response =
        AccountResponsePayload::builder().message("account found").account(account.into()).build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_account_by_id(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let account_id = id
        .trim()
        .parse::<u64>()
        .map(AccountId::from)
        .map_err(|_| AppError::invalid_input("account id must be a positive integer"))?;

    let account = engine.get_account_by_id(client_id, account_id).await?;

    let response =
        AccountResponsePayload::builder().message("account found").account(account.into()).build();

    Ok(Json(response))
}

// TRANSACTIONS
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn list_transactions(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let ListTransactionsQueryDissolved { limit } = query.dissolve();

    let txs = engine.list_transactions(client_id, limit).await?;

    Ok(Json(transactions_response("transactions found", txs)))
}

#[tracing::instrument(skip_all)]
pub async fn recent_transactions(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<ListTransactionsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let txs = engine.list_transactions(client_id, Some(RECENT_TRANSACTIONS)).await?;

    Ok(Json(transactions_response("recent transactions", txs)))
}

#[tracing::instrument(skip_all)]
pub async fn deposit(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<TransactionRequestPayload>,
) -> Result<Created<TransactionResponsePayload>, AppError> {
    execute_transaction(app, client_id, TransactionKind::Deposit, payload, "deposit completed")
        .await
}

#[tracing::instrument(skip_all)]
pub async fn withdraw(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<TransactionRequestPayload>,
) -> Result<Created<TransactionResponsePayload>, AppError> {
    execute_transaction(app, client_id, TransactionKind::Withdrawal, payload, "withdrawal completed")
        .await
}

#[tracing::instrument(skip_all)]
pub async fn transfer(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<TransactionRequestPayload>,
) -> Result<Created<TransactionResponsePayload>, AppError> {
    execute_transaction(app, client_id, TransactionKind::Transfer, payload, "transfer completed")
        .await
}

// OPERATIONS
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn calculate_interest(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<AccountNumberRequestPayload>,
) -> Result<Json<InterestResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let AccountNumberRequestPayloadDissolved { account_number } = payload.dissolve();
    let number = parse_account_number(&account_number)?;

    let InterestResponseDissolved { interest, account, transaction } =
        engine.accrue_interest(client_id, &number).await?.dissolve();

    let response = InterestResponsePayload::builder()
        .message("interest applied")
        .interest(round_money(interest))
        .account(account.into())
        .transaction(transaction.into())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn reset_withdrawal_limit(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<AccountNumberRequestPayload>,
) -> Result<Json<AccountResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let AccountNumberRequestPayloadDissolved { account_number } = payload.dissolve();
    let number = parse_account_number(&account_number)?;

    let account = engine.reset_withdrawal_count(client_id, &number).await?;

    let response = AccountResponsePayload::builder()
        .message("withdrawal count reset")
        .account(account.into())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(%number))]
pub async fn overdraft_status(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    Path(number): Path<String>,
) -> Result<Json<OverdraftStatusResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let number = parse_account_number(&number)?;

    let OverdraftStatusDissolved {
        account,
        is_overdrawn,
        overdraft_amount,
        overdraft_limit,
        available_balance,
    } = engine.overdraft_status(client_id, &number).await?.dissolve();

    let response = OverdraftStatusResponsePayload::builder()
        .message("overdraft status")
        .account_number(account.number().to_string())
        .is_overdrawn(is_overdrawn)
        .overdraft_amount(round_money(overdraft_amount))
        .balance(round_money(account.balance()))
        .overdraft_limit(round_money(overdraft_limit))
        .available_balance(round_money(available_balance))
        .build();

    Ok(Json(response))
}

// PAYMENTS
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn process_payment(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
    AppJson(payload): AppJson<PaymentRequestPayload>,
) -> Result<Created<TransactionResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let PaymentRequestPayloadDissolved { account_number, amount, service_type, reference, notes } =
        payload.dissolve();

    let request = PaymentRequest::builder()
        .account_number(parse_account_number(&account_number)?)
        .amount(amount)
        .service_type(service_type)
        .reference(reference)
        .maybe_notes(notes)
        .build()
        .map_err(RequestError::from)?;

    let response = engine.process_payment(client_id, request).await?;

    Ok((StatusCode::CREATED, Json(transaction_response("payment processed", response.dissolve()))))
}

#[tracing::instrument(skip_all)]
pub async fn payment_history(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<ListTransactionsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let payments = engine.payment_history(client_id).await?;

    Ok(Json(transactions_response("payment history", payments)))
}

#[tracing::instrument(skip_all)]
pub async fn payment_categories(
    AuthenticatedClient(_): AuthenticatedClient,
) -> Json<PaymentCategoriesResponsePayload> {
    Json(
        PaymentCategoriesResponsePayload::builder()
            .message("payment categories")
            .categories(PAYMENT_CATEGORIES)
            .build(),
    )
}

// DASHBOARD
// ================================================================================================

#[tracing::instrument(skip_all)]
pub async fn dashboard_stats(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<DashboardStatsResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let DashboardStatsDissolved {
        account_stats,
        monthly_income,
        monthly_expenses,
        recent_transactions,
    } = engine.dashboard_stats(client_id).await?.dissolve();

    let AccountStatsDissolved {
        total_balance,
        total_accounts,
        savings_accounts,
        checking_accounts,
        active_accounts,
    } = account_stats.dissolve();

    let response = DashboardStatsResponsePayload::builder()
        .message("dashboard statistics")
        .total_balance(round_money(total_balance))
        .total_accounts(total_accounts)
        .savings_accounts(savings_accounts)
        .checking_accounts(checking_accounts)
        .active_accounts(active_accounts)
        .monthly_income(round_money(monthly_income))
        .monthly_expenses(round_money(monthly_expenses))
        .recent_transactions(recent_transactions.into_iter().map(From::from).collect_vec())
        .build();

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
pub async fn dashboard_summary(
    AuthenticatedClient(client_id): AuthenticatedClient,
    State(app): State<App>,
) -> Result<Json<DashboardSummaryResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let DashboardSummaryDissolved {
        client,
        total_balance,
        savings_balance,
        checking_balance,
        total_accounts,
        total_transactions,
        monthly_transactions,
    } = engine.dashboard_summary(client_id).await?.dissolve();

    let response = DashboardSummaryResponsePayload::builder()
        .message("dashboard summary")
        .client(client.into())
        .total_balance(round_money(total_balance))
        .savings_balance(round_money(savings_balance))
        .checking_balance(round_money(checking_balance))
        .total_accounts(total_accounts)
        .total_transactions(total_transactions)
        .monthly_transactions(monthly_transactions)
        .build();

    Ok(Json(response))
}

// HELPERS
// ================================================================================================

async fn execute_transaction(
    app: App,
    client_id: ClientId,
    kind: TransactionKind,
    payload: TransactionRequestPayload,
    message: &'static str,
) -> Result<Created<TransactionResponsePayload>, AppError> {
    let AppDissolved { engine, .. } = app.dissolve();

    let TransactionRequestPayloadDissolved {
        account_number,
        destination_account_number,
        amount,
        description,
    } = payload.dissolve();

    let destination =
        destination_account_number.as_deref().map(parse_account_number).transpose()?;

    let request = TransactionRequest::builder()
        .kind(kind)
        .origin(parse_account_number(&account_number)?)
        .maybe_destination(destination)
        .amount(amount)
        .maybe_description(description)
        .build()
        .map_err(RequestError::from)?;

    let response = engine.execute_transaction(client_id, request).await?;

    Ok((StatusCode::CREATED, Json(transaction_response(message, response.dissolve()))))
}

fn transaction_response(
    message: &'static str,
    response: TransactionResponseDissolved,
) -> TransactionResponsePayload {
    let TransactionResponseDissolved { transaction, origin, destination } = response;

    TransactionResponsePayload::builder()
        .message(message)
        .transaction(transaction.into())
        .account(origin.into())
        .maybe_destination_account(destination.map(From::from))
        .build()
}

fn transactions_response(
    message: &'static str,
    txs: Vec<digibank_domain::Transaction>,
) -> ListTransactionsResponsePayload {
    ListTransactionsResponsePayload::builder()
        .message(message)
        .total(txs.len())
        .transactions(txs.into_iter().map(From::from).collect_vec())
        .build()
}

fn parse_account_number(number: &str) -> Result<AccountNumber, AppError> {
    number
        .trim()
        .parse()
        .map_err(|err| AppError::invalid_input(format!("invalid account number: {err}")))
}
