//! Cheap lexical checks deciding whether a file is worth parsing.
//!
//! These run on raw text. False positives only cost a parse that finds
//! nothing; a file that really defines routes must never be rejected.

use once_cell::sync::Lazy;
use regex::Regex;

static EXPRESS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:require\s*\(\s*|from\s+|import\s+)['"]express['"]"#).unwrap()
});

static VERB_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\s*(?:get|post|put|delete|patch|options|head|all)\s*\(").unwrap()
});

static APP_OR_ROUTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:app|router)\b\s*(?:[=:.]|\?\.)").unwrap());

static ROUTER_FACTORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:Router|express)\s*\(").unwrap());

static NEST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(?:Controller|Get|Post|Put|Delete|Patch|Options|Head|All)\b").unwrap()
});

const NEST_PACKAGE: &str = "@nestjs/";

/// Imperative style: an `express` import, or verb calls next to an
/// `app`/`router` variable, or a `Router()`/`express()` factory call.
pub fn looks_like_express(text: &str) -> bool {
    EXPRESS_IMPORT.is_match(text)
        || (VERB_CALL.is_match(text) && APP_OR_ROUTER.is_match(text))
        || ROUTER_FACTORY.is_match(text)
}

/// Decorator style: needs both the NestJS package and a route decorator.
pub fn looks_like_nestjs(text: &str) -> bool {
    text.contains(NEST_PACKAGE) && NEST_MARKER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_express_import_forms() {
        assert!(looks_like_express("const express = require('express');"));
        assert!(looks_like_express("import express from \"express\";"));
        assert!(looks_like_express("import { Router } from 'express';"));
        assert!(looks_like_express("import 'express';"));
    }

    #[test]
    fn test_express_without_import() {
        assert!(looks_like_express("router.get('/x', h);"));
        assert!(looks_like_express("const app = createApp();\napp.post('/y', h);"));
        assert!(looks_like_express("export const users = Router();"));
    }

    #[test]
    fn test_express_rejects_unrelated_code() {
        assert!(!looks_like_express("const map = new Map();\nmap.get('key');"));
        assert!(!looks_like_express("import React from 'react';"));
        assert!(!looks_like_express("const express_lane = 1;"));
    }

    #[test]
    fn test_nestjs_requires_both_signals() {
        let full = "import { Controller, Get } from '@nestjs/common';\n@Controller('cats')\nclass C {}";
        assert!(looks_like_nestjs(full));

        assert!(!looks_like_nestjs("@Controller('cats')\nclass C {}"));
        assert!(!looks_like_nestjs("import { Module } from '@nestjs/common';\n@Module({})"));
    }

    #[test]
    fn test_route_bearing_sources_are_accepted() {
        let express = [
            "const router = express.Router();\nrouter.get('/items/:id', auth, getItem);\n",
            "const admin = Router();\nadmin.delete('/users/:id', removeUser);\n",
            "const server = express();\nserver.put('/config', saveConfig);\n",
            "router.post('/orders', [auth, validate], rateLimit, createOrder);",
            "router.get(`/users/${userId}/posts//`, h);",
            "app.all('/a', h);",
            "app?.get('/a', h);",
        ];
        for src in express {
            assert!(looks_like_express(src), "{src}");
        }

        let nest = [
            "import { Controller, Get } from '@nestjs/common';\n@Controller('cats')\nexport class C {\n  @Get(':id')\n  one() {}\n}",
            "import * as common from '@nestjs/common';\n@common.Controller()\nclass C {\n  @Head()\n  h() {}\n}",
        ];
        for src in nest {
            assert!(looks_like_nestjs(src), "{src}");
        }
    }

    #[test]
    fn test_nestjs_marker_is_word_bounded() {
        let src = "import { Injectable } from '@nestjs/common';\n@GetterThing()\nclass S {}";
        assert!(!looks_like_nestjs(src));
    }
}
