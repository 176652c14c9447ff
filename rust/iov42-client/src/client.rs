//! A signing session against one platform node.

use std::slice;

use iov42_protocol::request::{
    AddDelegateRequest, CreateAssetClaimsRequest, CreateAssetEndorsementsRequest,
    CreateIdentityClaimsRequest, CreateIdentityEndorsementsRequest, IssueIdentityRequest,
    Transfer, TransfersRequest,
};
use iov42_protocol::{
    AuthorizationAssembler, ClaimCommitment, ConsistencyWindow, FinalizedBody, Identity,
    RequestId, SignedWrite, authenticate_read, commit, endorse, endorsement_map, hashes,
};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{
    ClientConfig, IdentityInfo, NodeInfo, Paging, RequestSummary, RequestTransport,
    ResponseResult, TransportError, path_and_query,
};

/// A session acting as one [`Identity`].
///
/// Holds the delegation mode and the consistency window for that identity.
/// Operations that change either take `&mut self`, so one session serves
/// one request at a time. Run separate sessions for concurrent work.
#[derive(Debug)]
pub struct Client {
    transport: RequestTransport,
    identity: Identity,
    assembler: AuthorizationAssembler,
    window: ConsistencyWindow,
}

impl Client {
    pub fn new(config: ClientConfig, identity: Identity) -> Result<Self, TransportError> {
        let window = ConsistencyWindow::new(config.consistency_delay);
        let transport = RequestTransport::new(config)?;

        Ok(Self {
            transport,
            identity,
            assembler: AuthorizationAssembler::new(),
            window,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn transport(&self) -> &RequestTransport {
        &self.transport
    }

    pub fn consistency_window(&self) -> &ConsistencyWindow {
        &self.window
    }

    /// Sign everything that follows on behalf of `delegator_id`.
    ///
    /// The platform rejects these requests unless `delegator_id` has
    /// previously added this session's identity as a delegate.
    pub fn use_delegator(&mut self, delegator_id: impl Into<String>) {
        self.assembler.use_delegator(delegator_id);
    }

    pub fn stop_using_delegator(&mut self) {
        self.assembler.stop_using_delegator();
    }

    pub fn delegator(&self) -> Option<&str> {
        self.assembler.delegator()
    }

    /// Authorise `body` by `signers`, authenticate as `authenticator` and
    /// submit it, disclosing `claims` alongside.
    pub async fn submit<T>(
        &mut self,
        body: FinalizedBody,
        signers: &[Identity],
        authenticator: &Identity,
        claims: &[ClaimCommitment],
    ) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        let write =
            SignedWrite::assemble(&self.assembler, body, signers, authenticator, claims).await?;
        self.send(write).await
    }

    async fn send<T>(&mut self, write: SignedWrite) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        self.window.start_write();
        let result = self.transport.put(&write).await;
        // A 2xx whose body fails to decode still committed the write.
        match &result {
            Ok(response) if response.success => self.window.end_write(),
            Err(TransportError::Decode { .. }) => self.window.end_write(),
            _ => self.window.cancel_write(),
        }
        result
    }

    /// Register this session's identity and public key.
    ///
    /// The new identity authorises and authenticates its own issuance,
    /// regardless of delegation mode.
    pub async fn issue_identity(
        &mut self,
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let request =
            IssueIdentityRequest::new(self.identity.id(), self.identity.public_credentials());
        let body = FinalizedBody::new(&request)?;
        let write = SignedWrite::assemble(
            &AuthorizationAssembler::new(),
            body,
            slice::from_ref(&self.identity),
            &self.identity,
            &[],
        )
        .await?;
        self.send(write).await
    }

    /// Allow `delegate` to act on behalf of this session's identity.
    ///
    /// Both parties authorise the grant.
    pub async fn add_delegate(
        &mut self,
        delegate: &Identity,
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let request = AddDelegateRequest::new(self.identity.id(), delegate.id());
        let body = FinalizedBody::new(&request)?;
        let signers = [self.identity.clone(), delegate.clone()];
        let write = SignedWrite::assemble(
            &AuthorizationAssembler::new(),
            body,
            &signers,
            &self.identity,
            &[],
        )
        .await?;
        self.send(write).await
    }

    /// Commit claims on an identity. Hashes go in the signed body, the
    /// plaintext travels in the disclosure header.
    pub async fn create_identity_claims<I, S>(
        &mut self,
        subject_id: &str,
        claims: I,
    ) -> Result<ResponseResult<RequestSummary>, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commitments = commit(claims);
        let request = CreateIdentityClaimsRequest::new(subject_id, hashes(&commitments));
        let body = FinalizedBody::new(&request)?;
        self.submit_as_self(body, &commitments).await
    }

    /// Commit claims on an asset or asset type.
    pub async fn create_asset_claims<I, S>(
        &mut self,
        subject_id: &str,
        subject_type_id: &str,
        claims: I,
    ) -> Result<ResponseResult<RequestSummary>, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commitments = commit(claims);
        let request =
            CreateAssetClaimsRequest::new(subject_id, subject_type_id, hashes(&commitments));
        let body = FinalizedBody::new(&request)?;
        self.submit_as_self(body, &commitments).await
    }

    /// Have `endorser` attest to claims on an identity.
    pub async fn endorse_identity_claims<I, S>(
        &mut self,
        subject_id: &str,
        claims: I,
        endorser: &Identity,
    ) -> Result<ResponseResult<RequestSummary>, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commitments = commit(claims);
        let endorsements = endorse(endorser, subject_id, None, &commitments).await?;
        let request = CreateIdentityEndorsementsRequest::new(
            subject_id,
            endorser.id(),
            endorsement_map(&endorsements),
        );
        let body = FinalizedBody::new(&request)?;
        self.submit_endorsements(body, endorser, &commitments).await
    }

    /// Have `endorser` attest to claims on an asset or asset type.
    pub async fn endorse_asset_claims<I, S>(
        &mut self,
        subject_id: &str,
        subject_type_id: &str,
        claims: I,
        endorser: &Identity,
    ) -> Result<ResponseResult<RequestSummary>, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commitments = commit(claims);
        let endorsements =
            endorse(endorser, subject_id, Some(subject_type_id), &commitments).await?;
        let request = CreateAssetEndorsementsRequest::new(
            subject_id,
            subject_type_id,
            endorser.id(),
            endorsement_map(&endorsements),
        );
        let body = FinalizedBody::new(&request)?;
        self.submit_endorsements(body, endorser, &commitments).await
    }

    /// Apply `transfers` atomically, authorised by every identity in
    /// `signers` in the given order and authenticated by this session.
    pub async fn transfer(
        &mut self,
        transfers: Vec<Transfer>,
        signers: &[Identity],
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let body = FinalizedBody::new(&TransfersRequest::new(transfers))?;
        let authenticator = self.identity.clone();
        self.submit(body, signers, &authenticator, &[]).await
    }

    async fn submit_as_self(
        &mut self,
        body: FinalizedBody,
        claims: &[ClaimCommitment],
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let identity = self.identity.clone();
        self.submit(body, slice::from_ref(&identity), &identity, claims)
            .await
    }

    async fn submit_endorsements(
        &mut self,
        body: FinalizedBody,
        endorser: &Identity,
        claims: &[ClaimCommitment],
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let identity = self.identity.clone();
        self.submit(body, slice::from_ref(endorser), &identity, claims)
            .await
    }

    /// Signed GET of `path`, delayed once if a recent write may not have
    /// replicated yet.
    ///
    /// `path` is relative to the configured endpoint. A path that already
    /// starts with the endpoint's own path (e.g. `/api/v1/identities/x`) is
    /// used as is.
    pub async fn read<T>(
        &mut self,
        path: &str,
        paging: &Paging,
    ) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        if let Some(waited) = self.window.before_read().await {
            trace!(path, waited_ms = waited.as_millis() as u64, "read delayed");
        }

        let url = self.transport.read_url(path, paging)?;
        let delegator = self.assembler.delegator();
        let authentication =
            authenticate_read(path_and_query(&url), &self.identity, delegator).await?;
        self.transport.get(url, Some(&authentication)).await
    }

    /// Status of a previously submitted write.
    pub async fn get_request(
        &mut self,
        request_id: &RequestId,
    ) -> Result<ResponseResult<RequestSummary>, TransportError> {
        let path = format!("requests/{request_id}");
        self.read(&path, &Paging::default()).await
    }

    pub async fn get_identity(
        &mut self,
        identity_id: &str,
    ) -> Result<ResponseResult<IdentityInfo>, TransportError> {
        let path = format!("identities/{identity_id}");
        self.read(&path, &Paging::default()).await
    }

    pub async fn node_info(&mut self) -> Result<ResponseResult<NodeInfo>, TransportError> {
        self.read("node-info", &Paging::default()).await
    }
}
