//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::MatchStore;
use super::models::{GroupRow, MemberRow, PairRow, ParticipantRow, RoundRow};
use crate::config::MatcherConfig;
use crate::domain::{
    Availability, Group, GroupId, Member, MetOutcome, Pair, PairId, Participant, ParticipantId,
    Round, RoundId,
};
use crate::error::MatcherError;

const PARTICIPANT_COLUMNS: &str = "id, handle, given_name, surname, intro, excludable, joined_at";
const PAIR_COLUMNS: &str = "id, round_id, first_id, second_id, met, created_at";

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings in `config` and applies the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::Persistence`] if the connection or a
    /// migration fails.
    pub async fn connect(config: &MatcherConfig) -> Result<Self, MatcherError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(db_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| MatcherError::Persistence(e.to_string()))?;

        tracing::info!("postgres store ready");
        Ok(Self::new(pool))
    }
}

/// Maps a driver error, turning unique violations into conflicts.
fn db_error(e: sqlx::Error) -> MatcherError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return MatcherError::Conflict(db.message().to_string());
    }
    MatcherError::Persistence(e.to_string())
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn insert_group(&self, group: Group) -> Result<Group, MatcherError> {
        sqlx::query("INSERT INTO groups (id, name, channel_id, created_at) VALUES ($1, $2, $3, $4)")
            .bind(group.id.as_uuid())
            .bind(&group.name)
            .bind(&group.channel_id)
            .bind(group.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, MatcherError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, channel_id, created_at FROM groups ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn group(&self, id: GroupId) -> Result<Group, MatcherError> {
        sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, channel_id, created_at FROM groups WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .map(Group::from)
        .ok_or(MatcherError::GroupNotFound(id))
    }

    async fn insert_participant(
        &self,
        participant: Participant,
    ) -> Result<Participant, MatcherError> {
        sqlx::query(
            "INSERT INTO participants (id, handle, given_name, surname, intro, excludable, joined_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(participant.id.as_uuid())
        .bind(&participant.handle)
        .bind(&participant.given_name)
        .bind(&participant.surname)
        .bind(&participant.intro)
        .bind(participant.excludable)
        .bind(participant.joined_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(participant)
    }

    async fn participant(&self, id: ParticipantId) -> Result<Participant, MatcherError> {
        sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .map(Participant::from)
        .ok_or(MatcherError::ParticipantNotFound(id))
    }

    async fn update_participant(&self, participant: &Participant) -> Result<(), MatcherError> {
        let result = sqlx::query(
            "UPDATE participants SET given_name = $2, surname = $3, intro = $4, excludable = $5 \
             WHERE id = $1",
        )
        .bind(participant.id.as_uuid())
        .bind(&participant.given_name)
        .bind(&participant.surname)
        .bind(&participant.intro)
        .bind(participant.excludable)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(MatcherError::ParticipantNotFound(participant.id));
        }
        Ok(())
    }

    async fn add_membership(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<(), MatcherError> {
        // Resolve both sides first so a missing row reports the right 404.
        self.group(group_id).await?;
        self.participant(participant_id).await?;
        sqlx::query(
            "INSERT INTO memberships (group_id, participant_id) VALUES ($1, $2) \
             ON CONFLICT (group_id, participant_id) DO NOTHING",
        )
        .bind(group_id.as_uuid())
        .bind(participant_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn set_availability(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
        availability: Availability,
    ) -> Result<(), MatcherError> {
        let result = sqlx::query(
            "UPDATE memberships SET availability = $3 WHERE group_id = $1 AND participant_id = $2",
        )
        .bind(group_id.as_uuid())
        .bind(participant_id.as_uuid())
        .bind(availability.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(MatcherError::InvalidRequest(format!(
                "participant {participant_id} is not a member of group {group_id}"
            )));
        }
        Ok(())
    }

    async fn reset_availability(&self, group_id: GroupId) -> Result<usize, MatcherError> {
        let result = sqlx::query("UPDATE memberships SET availability = 'unknown' WHERE group_id = $1")
            .bind(group_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn members(&self, group_id: GroupId) -> Result<Vec<Member>, MatcherError> {
        self.group(group_id).await?;
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT p.id, p.handle, p.given_name, p.surname, p.intro, p.excludable, p.joined_at, \
                    m.availability \
             FROM memberships m JOIN participants p ON p.id = m.participant_id \
             WHERE m.group_id = $1 ORDER BY m.joined_at, p.id",
        )
        .bind(group_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn insert_round(&self, round: Round) -> Result<Round, MatcherError> {
        self.group(round.group_id).await?;
        sqlx::query(
            "INSERT INTO rounds (id, group_id, start_date, end_date, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(round.id.as_uuid())
        .bind(round.group_id.as_uuid())
        .bind(round.start_date)
        .bind(round.end_date)
        .bind(round.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(round)
    }

    async fn round(&self, id: RoundId) -> Result<Round, MatcherError> {
        sqlx::query_as::<_, RoundRow>(
            "SELECT id, group_id, start_date, end_date, created_at FROM rounds WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .map(Round::from)
        .ok_or(MatcherError::RoundNotFound(id))
    }

    async fn pair_count(&self, round_id: RoundId) -> Result<usize, MatcherError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pairs WHERE round_id = $1")
            .bind(round_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn pair_history(&self) -> Result<Vec<(ParticipantId, ParticipantId)>, MatcherError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>("SELECT first_id, second_id FROM pairs")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows
            .into_iter()
            .map(|(a, b)| (ParticipantId::from_uuid(a), ParticipantId::from_uuid(b)))
            .collect())
    }

    async fn commit_pairs(
        &self,
        round_id: RoundId,
        pairs: Vec<Pair>,
    ) -> Result<Vec<Pair>, MatcherError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Row lock on the round serializes concurrent commits for it.
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM rounds WHERE id = $1 FOR UPDATE")
            .bind(round_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        if locked.is_none() {
            return Err(MatcherError::RoundNotFound(round_id));
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pairs WHERE round_id = $1")
            .bind(round_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;
        if existing > 0 {
            return Err(MatcherError::AlreadyPaired(round_id));
        }

        for pair in &pairs {
            if pair.round_id != round_id {
                return Err(MatcherError::Internal(format!(
                    "pair {} belongs to round {}, not {round_id}",
                    pair.id, pair.round_id
                )));
            }
            sqlx::query(
                "INSERT INTO pairs (id, round_id, first_id, second_id, met, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(pair.id.as_uuid())
            .bind(round_id.as_uuid())
            .bind(pair.first.as_uuid())
            .bind(pair.second.as_uuid())
            .bind(Option::<bool>::from(pair.met))
            .bind(pair.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(pairs)
    }

    async fn pairs_for_round(&self, round_id: RoundId) -> Result<Vec<Pair>, MatcherError> {
        let rows = sqlx::query_as::<_, PairRow>(&format!(
            "SELECT {PAIR_COLUMNS} FROM pairs WHERE round_id = $1 ORDER BY created_at, id"
        ))
        .bind(round_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Pair::from).collect())
    }

    async fn pair(&self, id: PairId) -> Result<Pair, MatcherError> {
        sqlx::query_as::<_, PairRow>(&format!("SELECT {PAIR_COLUMNS} FROM pairs WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Pair::from)
            .ok_or(MatcherError::PairNotFound(id))
    }

    async fn set_met(&self, id: PairId, met: MetOutcome) -> Result<Pair, MatcherError> {
        sqlx::query_as::<_, PairRow>(&format!(
            "UPDATE pairs SET met = $2 WHERE id = $1 RETURNING {PAIR_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(Option::<bool>::from(met))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .map(Pair::from)
        .ok_or(MatcherError::PairNotFound(id))
    }

    async fn latest_pair_in_group(
        &self,
        participant_id: ParticipantId,
        group_id: GroupId,
    ) -> Result<Option<Pair>, MatcherError> {
        let row = sqlx::query_as::<_, PairRow>(
            "SELECT p.id, p.round_id, p.first_id, p.second_id, p.met, p.created_at \
             FROM pairs p JOIN rounds r ON r.id = p.round_id \
             WHERE r.group_id = $1 AND (p.first_id = $2 OR p.second_id = $2) \
             ORDER BY r.end_date DESC, r.created_at DESC LIMIT 1",
        )
        .bind(group_id.as_uuid())
        .bind(participant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Pair::from))
    }

    async fn round_count(&self, group_id: GroupId) -> Result<usize, MatcherError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rounds WHERE group_id = $1")
            .bind(group_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn pairs_for_group(&self, group_id: GroupId) -> Result<Vec<Pair>, MatcherError> {
        let rows = sqlx::query_as::<_, PairRow>(
            "SELECT p.id, p.round_id, p.first_id, p.second_id, p.met, p.created_at \
             FROM pairs p JOIN rounds r ON r.id = p.round_id \
             WHERE r.group_id = $1 \
             ORDER BY p.created_at, p.id",
        )
        .bind(group_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Pair::from).collect())
    }
}
