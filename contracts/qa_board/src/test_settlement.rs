extern crate std;

use soroban_sdk::{
    contract, contractimpl,
    testutils::{Address as _, Ledger},
    token, Address, BytesN, Env,
};

use crate::invariants;
use crate::{AnswerStatus, Currency, Error, QaBoard, QaBoardClient, QuestionStatus};

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn setup() -> (Env, QaBoardClient<'static>, Address, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(QaBoard, ());
    let client = QaBoardClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let native = create_token(&env, &token_admin);
    client.init(&owner, &native.address);
    (env, client, owner, native)
}

fn mint(env: &Env, token_addr: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token_addr).mint(to, &amount);
}

fn dummy_content(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0xabu8; 32])
}

fn future_deadline(env: &Env) -> u64 {
    env.ledger().timestamp() + 7_200
}

/// Moderation registry stub that flags exactly one content pointer.
#[contract]
struct SingleFlagRegistry;

#[contractimpl]
impl SingleFlagRegistry {
    pub fn is_flagged(env: Env, content: BytesN<32>) -> bool {
        content == BytesN::from_array(&env, &[0xffu8; 32])
    }
}

#[test]
fn accept_answer_pays_native_bounty_to_winner() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let first_answerer = Address::generate(&env);
    let second_answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 100);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &100,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let before = client.get_question(&id);

    let a1 = client.post_answer(&id, &first_answerer, &dummy_content(&env));
    let a2 = client.post_answer(&id, &second_answerer, &dummy_content(&env));
    assert_eq!(a1, 1);
    assert_eq!(a2, 2);
    invariants::assert_answers_count_monotonic(
        before.answers_count,
        client.get_question(&id).answers_count,
    );

    client.accept_answer(&asker, &id, &a2);

    let question = client.get_question(&id);
    assert_eq!(question.status, QuestionStatus::Resolved);
    assert_eq!(question.accepted_answer_id, a2);
    assert_eq!(question.bounty, 0);
    invariants::assert_valid_status_transition(&before.status, &question.status);
    invariants::assert_question_immutable_fields(&before, &question);
    invariants::assert_all_question_invariants(&question);

    let winner = client.get_answer(&id, &a2);
    assert_eq!(winner.status, AnswerStatus::Accepted);
    let loser = client.get_answer(&id, &a1);
    assert_eq!(loser.status, AnswerStatus::Posted);

    // Full escrow moved to the winner, nothing left in custody.
    assert_eq!(native.balance(&second_answerer), 100);
    assert_eq!(native.balance(&first_answerer), 0);
    assert_eq!(native.balance(&client.address), 0);
    invariants::assert_value_conservation(100, 100, 0, question.bounty);

    let rep = client.get_reputation(&second_answerer);
    assert_eq!(rep.answers_posted, 1);
    assert_eq!(rep.answers_accepted, 1);
}

#[test]
fn accept_answer_same_pair_succeeds_at_most_once() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 60);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &60,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    client.accept_answer(&asker, &id, &aid);
    let balance_after_first = native.balance(&answerer);

    // Second acceptance is a state-conflict error and moves no value.
    assert_eq!(
        client.try_accept_answer(&asker, &id, &aid),
        Err(Ok(Error::QuestionNotOpen))
    );
    assert_eq!(native.balance(&answerer), balance_after_first);
    assert_eq!(native.balance(&client.address), 0);
}

#[test]
fn accept_answer_zero_bounty_resolves_without_payout() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &0,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));
    client.accept_answer(&asker, &id, &aid);

    let question = client.get_question(&id);
    assert_eq!(question.status, QuestionStatus::Resolved);
    assert_eq!(question.accepted_answer_id, aid);
    assert_eq!(native.balance(&answerer), 0);
    invariants::assert_all_question_invariants(&question);
}

#[test]
fn accept_answer_rejects_out_of_range_ids() {
    let (env, client, _owner, _native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &0,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    client.post_answer(&id, &answerer, &dummy_content(&env));

    assert_eq!(
        client.try_accept_answer(&asker, &id, &0),
        Err(Ok(Error::AnswerNotFound))
    );
    assert_eq!(
        client.try_accept_answer(&asker, &id, &2),
        Err(Ok(Error::AnswerNotFound))
    );
}

#[test]
fn accept_answer_requires_asker_or_owner() {
    let (env, client, _owner, _native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    let intruder = Address::generate(&env);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &0,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    assert_eq!(
        client.try_accept_answer(&intruder, &id, &aid),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn owner_override_accepts_through_identical_procedure() {
    let (env, client, owner, native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 20);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &20,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    client.accept_answer(&owner, &id, &aid);

    let question = client.get_question(&id);
    assert_eq!(question.status, QuestionStatus::Resolved);
    assert_eq!(native.balance(&answerer), 20);
}

#[test]
fn accept_answer_fails_on_terminal_question() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 10);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &10,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    env.ledger().with_mut(|li| li.timestamp += 10_000);
    client.refund_expired(&id);

    assert_eq!(
        client.try_accept_answer(&asker, &id, &aid),
        Err(Ok(Error::QuestionNotOpen))
    );
    assert_eq!(native.balance(&answerer), 0);
}

#[test]
fn rejected_answer_is_no_longer_acceptable() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let first_answerer = Address::generate(&env);
    let second_answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 40);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &40,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let a1 = client.post_answer(&id, &first_answerer, &dummy_content(&env));
    let a2 = client.post_answer(&id, &second_answerer, &dummy_content(&env));

    client.reject_answer(&asker, &id, &a1);
    assert_eq!(client.get_answer(&id, &a1).status, AnswerStatus::Rejected);

    // Rejection moves no value and leaves the question Open.
    let question = client.get_question(&id);
    assert_eq!(question.status, QuestionStatus::Open);
    assert_eq!(question.bounty, 40);
    assert_eq!(native.balance(&client.address), 40);

    // The rejected answer can no longer win; a sibling still can.
    assert_eq!(
        client.try_accept_answer(&asker, &id, &a1),
        Err(Ok(Error::AnswerAlreadyHandled))
    );
    client.accept_answer(&asker, &id, &a2);
    assert_eq!(native.balance(&second_answerer), 40);
    assert_eq!(native.balance(&first_answerer), 0);
}

#[test]
fn reject_answer_requires_asker_or_owner() {
    let (env, client, owner, _native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    let intruder = Address::generate(&env);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &0,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    assert_eq!(
        client.try_reject_answer(&intruder, &id, &aid),
        Err(Ok(Error::NotAuthorized))
    );

    // The owner may reject on the asker's behalf.
    client.reject_answer(&owner, &id, &aid);
    assert_eq!(client.get_answer(&id, &aid).status, AnswerStatus::Rejected);
    assert_eq!(
        client.try_reject_answer(&asker, &id, &aid),
        Err(Ok(Error::AnswerAlreadyHandled))
    );
}

#[test]
fn reject_answer_fails_on_terminal_question() {
    let (env, client, _owner, _native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &0,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));
    client.accept_answer(&asker, &id, &aid);

    assert_eq!(
        client.try_reject_answer(&asker, &id, &aid),
        Err(Ok(Error::QuestionNotOpen))
    );
}

#[test]
fn token_currency_settles_end_to_end() {
    let (env, client, _owner, _native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    let backer = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let fungible = create_token(&env, &token_admin);
    mint(&env, &fungible.address, &asker, 50);
    mint(&env, &fungible.address, &backer, 25);

    let id = client.submit_question(
        &asker,
        &Currency::Token(fungible.address.clone()),
        &50,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    client.add_bounty(&id, &backer, &25);
    let aid = client.post_answer(&id, &answerer, &dummy_content(&env));

    client.accept_answer(&asker, &id, &aid);

    assert_eq!(fungible.balance(&answerer), 75);
    assert_eq!(fungible.balance(&client.address), 0);
    invariants::assert_value_conservation(75, 75, 0, client.get_question(&id).bounty);
}

#[test]
fn moderation_blocks_acceptance_of_flagged_content() {
    let (env, client, owner, native) = setup();
    let asker = Address::generate(&env);
    let flagged_answerer = Address::generate(&env);
    let clean_answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 30);

    let registry = env.register(SingleFlagRegistry, ());
    client.set_moderation(&owner, &registry);

    let id = client.submit_question(
        &asker,
        &Currency::Native,
        &30,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let flagged = client.post_answer(
        &id,
        &flagged_answerer,
        &BytesN::from_array(&env, &[0xffu8; 32]),
    );
    let clean = client.post_answer(&id, &clean_answerer, &dummy_content(&env));

    // Acceptance is refused outright; the question stays Open and funded.
    assert_eq!(
        client.try_accept_answer(&asker, &id, &flagged),
        Err(Ok(Error::ContentFlagged))
    );
    let question = client.get_question(&id);
    assert_eq!(question.status, QuestionStatus::Open);
    assert_eq!(question.bounty, 30);

    // A clean sibling answer can still win the bounty.
    client.accept_answer(&asker, &id, &clean);
    assert_eq!(native.balance(&clean_answerer), 30);
}

#[test]
fn set_moderation_requires_owner() {
    let (env, client, _owner, _native) = setup();
    let intruder = Address::generate(&env);
    let registry = env.register(SingleFlagRegistry, ());
    assert_eq!(
        client.try_set_moderation(&intruder, &registry),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn value_conservation_across_mixed_settlements() {
    let (env, client, _owner, native) = setup();
    let asker = Address::generate(&env);
    let answerer = Address::generate(&env);
    mint(&env, &native.address, &asker, 300);

    // Question A: funded 100, answered, accepted → 100 paid out.
    let a = client.submit_question(
        &asker,
        &Currency::Native,
        &100,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    let a_answer = client.post_answer(&a, &answerer, &dummy_content(&env));
    client.accept_answer(&asker, &a, &a_answer);

    // Question B: funded 80, cancelled → 80 refunded.
    let b = client.submit_question(
        &asker,
        &Currency::Native,
        &80,
        &future_deadline(&env),
        &dummy_content(&env),
    );
    client.cancel_question(&b);

    // Question C: funded 120, still open → 120 escrowed.
    let c = client.submit_question(
        &asker,
        &Currency::Native,
        &120,
        &future_deadline(&env),
        &dummy_content(&env),
    );

    let escrowed = client.get_question(&c).bounty;
    invariants::assert_value_conservation(300, 100, 80, escrowed);
    assert_eq!(native.balance(&client.address), escrowed);
    assert_eq!(native.balance(&answerer), 100);
    assert_eq!(native.balance(&asker), 80);
}
