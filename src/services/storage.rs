// src/services/storage.rs
//
// Cliente do serviço externo de armazenamento de arquivos. Para o resto do
// sistema ele é opaco: upload devolve {url, public_id} e delete recebe o
// public_id de volta. Falhas viram AppError::UploadFailed.

use serde::Deserialize;

use crate::common::error::AppError;

// Arquivo recebido via multipart, já lido para a memória
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

// O que o serviço de armazenamento devolve num upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: String,
}

#[derive(Clone)]
pub struct StorageService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StorageService {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    pub async fn upload(
        &self,
        file: FileUpload,
        folder: &str,
    ) -> Result<UploadedAsset, AppError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::UploadFailed(format!(
                "o serviço respondeu {}",
                response.status()
            )));
        }

        let asset = response
            .json::<UploadedAsset>()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        Ok(asset)
    }

    pub async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(format!("{}/files/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::UploadFailed(format!(
                "o serviço respondeu {}",
                response.status()
            )));
        }

        Ok(())
    }
}
